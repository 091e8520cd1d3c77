use serde::Serialize;

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub session_id: String,

    /// One entry per phase, in execution order
    pub phases: Vec<PhaseReport>,

    /// Total run duration in milliseconds
    pub duration_ms: u64,
}

impl RunReport {
    pub fn task_count(&self) -> usize {
        self.phases.iter().map(|p| p.tasks.len()).sum()
    }

    /// Relative paths of every summary written during the run.
    pub fn summaries(&self) -> impl Iterator<Item = &str> {
        self.phases.iter().filter_map(|p| p.summary.as_deref())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport {
    pub name: String,

    /// Task reports in declaration order
    pub tasks: Vec<TaskReport>,

    /// Summary artifact path, for fan-in phases that produced one
    pub summary: Option<String>,

    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskReport {
    pub name: String,
    pub output_file: String,
    pub duration_ms: u64,

    /// Size of the stored artifact in bytes
    pub bytes: usize,
}
