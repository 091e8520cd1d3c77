use thiserror::Error;

/// Failure modes of one external agent invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    /// The process could not be started (binary missing, permission denied).
    #[error("failed to spawn {program}: {reason}")]
    Spawn { program: String, reason: String },

    /// The process ran and exited with a non-zero status.
    #[error("agent exited with code {exit_code}\nstderr: {stderr_excerpt}")]
    Execution {
        exit_code: i32,
        stderr_excerpt: String,
    },

    /// A pipe to the agent failed, so the prompt or the output is incomplete.
    #[error("agent {stream} pipe failed: {reason}")]
    Io { stream: String, reason: String },
}

impl InvokeError {
    pub fn is_spawn(&self) -> bool {
        matches!(self, Self::Spawn { .. })
    }
}
