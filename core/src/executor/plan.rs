use serde::Serialize;

use crate::error::PipelineError;
use crate::pipeline::PipelineDef;
use crate::prompt::{load_template, placeholders};

use super::types::RunContext;

/// What a run would do, computed without invoking any agent.
#[derive(Debug, Clone, Serialize)]
pub struct DryRunPlan {
    pub session_id: String,
    pub computed_context: String,
    pub phases: Vec<PhasePlan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhasePlan {
    pub name: String,
    pub summary_dir: Option<String>,
    pub tasks: Vec<TaskPlan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskPlan {
    pub name: String,
    pub prompt_file: String,
    pub output_file: String,
    pub template_found: bool,
    /// Template placeholders the task binds no source for.
    pub unbound: Vec<String>,
}

impl DryRunPlan {
    /// True when every task's template exists.
    pub fn is_ready(&self) -> bool {
        self.missing_templates().next().is_none()
    }

    pub fn missing_templates(&self) -> impl Iterator<Item = &TaskPlan> {
        self.phases
            .iter()
            .flat_map(|p| p.tasks.iter())
            .filter(|t| !t.template_found)
    }
}

/// Validate `pipeline` and inspect each task's template against its bindings.
pub async fn plan_dry_run(
    pipeline: &PipelineDef,
    ctx: &RunContext,
) -> Result<DryRunPlan, PipelineError> {
    pipeline.validate()?;

    let mut phases = Vec::with_capacity(pipeline.phases.len());
    for phase in &pipeline.phases {
        let mut tasks = Vec::with_capacity(phase.tasks.len());
        for task in &phase.tasks {
            let (template_found, unbound) =
                match load_template(&ctx.templates_root, &task.prompt_file).await {
                    Ok(template) => (
                        true,
                        placeholders(&template)
                            .into_iter()
                            .filter(|name| !task.vars.contains_key(*name))
                            .map(str::to_string)
                            .collect(),
                    ),
                    Err(e) => {
                        tracing::debug!(task = %task.name, error = %e, "template not readable");
                        (false, Vec::new())
                    }
                };

            tasks.push(TaskPlan {
                name: task.name.clone(),
                prompt_file: task.prompt_file.clone(),
                output_file: task.output_file.clone(),
                template_found,
                unbound,
            });
        }
        phases.push(PhasePlan {
            name: phase.name.clone(),
            summary_dir: phase.summary_dir.clone(),
            tasks,
        });
    }

    Ok(DryRunPlan {
        session_id: ctx.session_id.clone(),
        computed_context: ctx.computed_context.to_string(),
        phases,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::artifact::MemoryArtifactStore;
    use crate::pipeline::builtin_pipeline;
    use crate::session::RunInput;

    #[tokio::test]
    async fn test_dry_run_reports_missing_templates_and_unbound_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = builtin_pipeline();
        let first = &pipeline.phases[0].tasks[0];
        let path = dir.path().join(&first.prompt_file);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{SERVICE_ONE_LINER} / {USER_TYPES} / {UNKNOWN}").unwrap();

        let store = Arc::new(MemoryArtifactStore::new());
        let ctx = RunContext::new("s1", RunInput::default(), store.clone(), dir.path());
        let plan = plan_dry_run(&pipeline, &ctx).await.unwrap();

        let planned = &plan.phases[0].tasks[0];
        assert!(planned.template_found);
        assert_eq!(planned.unbound, ["UNKNOWN"]);
        assert!(!plan.is_ready());
        assert_eq!(plan.missing_templates().count(), pipeline.task_count() - 1);
        assert!(plan.computed_context.contains("서비스 요약: N/A"));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_dry_run_rejects_invalid_pipeline() {
        let ctx = RunContext::new(
            "s1",
            RunInput::default(),
            Arc::new(MemoryArtifactStore::new()),
            ".",
        );
        let err = plan_dry_run(&PipelineDef { phases: vec![] }, &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidDefinition(_)));
    }
}
