/// Options for one scheduler run.
#[derive(Debug, Clone, Default)]
pub struct ExecutionOpts {
    /// Upper bound on concurrently running tasks in a phase. `None` or `0`
    /// runs every task of the phase at once.
    pub max_parallel: Option<usize>,

    /// Enable visual progress bars (off for jsonl output)
    pub progress_bar: bool,
}

impl ExecutionOpts {
    pub fn effective_max_parallel(&self) -> Option<usize> {
        self.max_parallel.filter(|n| *n > 0)
    }
}
