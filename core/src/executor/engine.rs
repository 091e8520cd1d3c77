use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::artifact::synthesize;
use crate::error::{PipelineError, TaskError};
use crate::pipeline::{PhaseDef, PipelineDef, TaskDef};
use crate::prompt::{
    build_prompt, load_template, resolve_variables, template_path, unresolved_placeholders,
};
use crate::runner::AgentInvoker;

use super::progress::ProgressMonitor;
use super::scheduler::execute_phase_parallel;
use super::traits::{OutputRendererPlugin, RenderEvent};
use super::types::{ExecutionOpts, PhaseReport, RunContext, RunReport, TaskReport};

/// Runs a pipeline phase by phase; tasks inside a phase run concurrently.
pub struct PhaseScheduler {
    ctx: RunContext,
    invoker: Arc<dyn AgentInvoker>,
    opts: ExecutionOpts,
    renderer: Option<Arc<dyn OutputRendererPlugin>>,
}

pub struct PhaseSchedulerBuilder {
    ctx: RunContext,
    invoker: Arc<dyn AgentInvoker>,
    opts: ExecutionOpts,
    renderer: Option<Arc<dyn OutputRendererPlugin>>,
}

impl PhaseScheduler {
    pub fn builder(ctx: RunContext, invoker: Arc<dyn AgentInvoker>) -> PhaseSchedulerBuilder {
        PhaseSchedulerBuilder::new(ctx, invoker)
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Run every phase in order.
    ///
    /// The definition is validated before anything runs. A phase with any
    /// failed task aborts the run once all of its tasks have settled; its
    /// summary is not written and later phases never start.
    #[tracing::instrument(
        name = "pipeline.run",
        skip_all,
        fields(session_id = %self.ctx.session_id, invoker = %self.invoker.name())
    )]
    pub async fn run(&self, pipeline: &PipelineDef) -> Result<RunReport, PipelineError> {
        pipeline.validate()?;

        let start = Instant::now();
        let total_phases = pipeline.phases.len();
        let total_tasks = pipeline.task_count();
        let progress = Mutex::new(ProgressMonitor::new(total_tasks, self.opts.progress_bar));

        tracing::info!(phases = total_phases, tasks = total_tasks, "run start");
        self.emit(RenderEvent::RunStart {
            session_id: self.ctx.session_id.clone(),
            total_phases,
            total_tasks,
        });

        let mut phases = Vec::with_capacity(total_phases);
        for (phase_idx, phase) in pipeline.phases.iter().enumerate() {
            if let Ok(monitor) = progress.lock() {
                monitor.update_phase(phase_idx, total_phases, &phase.name);
            }

            match self.run_phase(phase_idx, phase, &progress).await {
                Ok(report) => phases.push(report),
                Err(e) => {
                    if let Ok(monitor) = progress.lock() {
                        monitor.finish(false);
                    }
                    self.emit_run_end(false, start);
                    return Err(e);
                }
            }
        }

        if let Ok(monitor) = progress.lock() {
            monitor.finish(true);
        }
        let duration_ms = self.emit_run_end(true, start);
        tracing::info!(duration_ms, "run complete");

        Ok(RunReport {
            session_id: self.ctx.session_id.clone(),
            phases,
            duration_ms,
        })
    }

    async fn run_phase(
        &self,
        phase_idx: usize,
        phase: &PhaseDef,
        progress: &Mutex<ProgressMonitor>,
    ) -> Result<PhaseReport, PipelineError> {
        let start = Instant::now();
        tracing::info!(phase = %phase.name, tasks = phase.tasks.len(), "phase start");
        self.emit(RenderEvent::PhaseStart {
            session_id: self.ctx.session_id.clone(),
            phase_idx,
            phase: phase.name.clone(),
            tasks: phase.tasks.iter().map(|t| t.name.clone()).collect(),
        });

        if let Ok(mut monitor) = progress.lock() {
            for task in &phase.tasks {
                monitor.add_task(&task.name);
            }
        }

        let outcomes = execute_phase_parallel(
            phase.tasks.iter().collect(),
            self.opts.effective_max_parallel(),
            |task| self.run_task(phase_idx, task, progress),
        )
        .await;

        let mut tasks = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(report) => tasks.push(report),
                Err(e) => failures.push(e),
            }
        }

        if !failures.is_empty() {
            tracing::error!(
                phase = %phase.name,
                failed = failures.len(),
                succeeded = tasks.len(),
                "phase failed"
            );
            self.emit_phase_end(phase_idx, phase, false);
            return Err(PipelineError::PhaseFailed {
                phase: phase.name.clone(),
                failures,
            });
        }

        let mut summary = None;
        if let Some(dir) = &phase.summary_dir {
            if let Some(artifact) = synthesize(self.ctx.store.as_ref(), dir).await? {
                self.emit(RenderEvent::SummaryWritten {
                    session_id: self.ctx.session_id.clone(),
                    phase_idx,
                    path: artifact.path.clone(),
                    sources: artifact.sources.len(),
                });
                summary = Some(artifact.path);
            }
        }

        self.emit_phase_end(phase_idx, phase, true);
        Ok(PhaseReport {
            name: phase.name.clone(),
            tasks,
            summary,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn run_task(
        &self,
        phase_idx: usize,
        task: &TaskDef,
        progress: &Mutex<ProgressMonitor>,
    ) -> Result<TaskReport, TaskError> {
        let start = Instant::now();
        self.emit(RenderEvent::TaskStart {
            session_id: self.ctx.session_id.clone(),
            phase_idx,
            task: task.name.clone(),
        });

        let outcome = self.execute_task(task).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        if let Ok(mut monitor) = progress.lock() {
            monitor.complete_task(&task.name, outcome.is_ok(), duration_ms);
        }

        match outcome {
            Ok(bytes) => {
                let report = TaskReport {
                    name: task.name.clone(),
                    output_file: task.output_file.clone(),
                    duration_ms,
                    bytes,
                };
                tracing::info!(task = %task.name, output = %task.output_file, bytes, duration_ms, "task complete");
                self.emit(RenderEvent::TaskComplete {
                    session_id: self.ctx.session_id.clone(),
                    phase_idx,
                    report: report.clone(),
                });
                Ok(report)
            }
            Err(e) => {
                tracing::error!(task = %task.name, error = %e, "task failed");
                self.emit(RenderEvent::TaskFailed {
                    session_id: self.ctx.session_id.clone(),
                    phase_idx,
                    task: task.name.clone(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// resolve -> template -> prompt -> agent -> artifact. Returns bytes written.
    async fn execute_task(&self, task: &TaskDef) -> Result<usize, TaskError> {
        let vars = resolve_variables(
            &task.vars,
            &self.ctx.input,
            &self.ctx.computed_context,
            self.ctx.store.as_ref(),
        )
        .await;

        let template = load_template(&self.ctx.templates_root, &task.prompt_file)
            .await
            .map_err(|source| TaskError::Template {
                task: task.name.clone(),
                path: template_path(&self.ctx.templates_root, &task.prompt_file)
                    .display()
                    .to_string(),
                source,
            })?;

        let unresolved = unresolved_placeholders(&template, &vars);
        if !unresolved.is_empty() {
            tracing::warn!(task = %task.name, placeholders = ?unresolved, "unbound placeholders left in prompt");
        }

        let prompt = build_prompt(&template, &vars);
        tracing::debug!(task = %task.name, prompt_len = prompt.len(), "invoking agent");

        let output = self
            .invoker
            .invoke(&prompt)
            .await
            .map_err(|source| TaskError::Invoke {
                task: task.name.clone(),
                source,
            })?;

        self.ctx
            .store
            .write(&task.output_file, &output)
            .await
            .map_err(|source| TaskError::ArtifactWrite {
                task: task.name.clone(),
                source,
            })?;

        Ok(output.len())
    }

    fn emit(&self, event: RenderEvent) {
        if let Some(renderer) = &self.renderer {
            renderer.render(&event);
        }
    }

    fn emit_phase_end(&self, phase_idx: usize, phase: &PhaseDef, success: bool) {
        self.emit(RenderEvent::PhaseEnd {
            session_id: self.ctx.session_id.clone(),
            phase_idx,
            phase: phase.name.clone(),
            success,
        });
    }

    fn emit_run_end(&self, success: bool, start: Instant) -> u64 {
        let duration_ms = start.elapsed().as_millis() as u64;
        self.emit(RenderEvent::RunEnd {
            session_id: self.ctx.session_id.clone(),
            success,
            duration_ms,
        });
        duration_ms
    }
}

impl PhaseSchedulerBuilder {
    pub fn new(ctx: RunContext, invoker: Arc<dyn AgentInvoker>) -> Self {
        Self {
            ctx,
            invoker,
            opts: ExecutionOpts::default(),
            renderer: None,
        }
    }

    pub fn opts(mut self, opts: ExecutionOpts) -> Self {
        self.opts = opts;
        self
    }

    pub fn max_parallel(mut self, max_parallel: Option<usize>) -> Self {
        self.opts.max_parallel = max_parallel;
        self
    }

    pub fn progress_bar(mut self, enabled: bool) -> Self {
        self.opts.progress_bar = enabled;
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn OutputRendererPlugin>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn build(self) -> PhaseScheduler {
        PhaseScheduler {
            ctx: self.ctx,
            invoker: self.invoker,
            opts: self.opts,
            renderer: self.renderer,
        }
    }
}
