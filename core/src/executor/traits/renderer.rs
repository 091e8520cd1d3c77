use crate::executor::types::TaskReport;

/// Output renderer plugin (controls the progress output format)
pub trait OutputRendererPlugin: Send + Sync {
    fn name(&self) -> &str;
    fn format(&self) -> &str;
    fn render(&self, event: &RenderEvent);
}

/// Lifecycle events emitted by the scheduler
#[derive(Debug, Clone)]
pub enum RenderEvent {
    RunStart {
        session_id: String,
        total_phases: usize,
        total_tasks: usize,
    },
    PhaseStart {
        session_id: String,
        phase_idx: usize,
        phase: String,
        tasks: Vec<String>,
    },
    TaskStart {
        session_id: String,
        phase_idx: usize,
        task: String,
    },
    TaskComplete {
        session_id: String,
        phase_idx: usize,
        report: TaskReport,
    },
    TaskFailed {
        session_id: String,
        phase_idx: usize,
        task: String,
        error: String,
    },
    SummaryWritten {
        session_id: String,
        phase_idx: usize,
        path: String,
        sources: usize,
    },
    PhaseEnd {
        session_id: String,
        phase_idx: usize,
        phase: String,
        success: bool,
    },
    RunEnd {
        session_id: String,
        success: bool,
        duration_ms: u64,
    },
}
