use std::fmt;

use thiserror::Error;

use super::artifact::ArtifactError;
use super::invoke::InvokeError;

/// Errors raised while running a pipeline definition.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid pipeline definition: {0}")]
    InvalidDefinition(String),

    #[error("{phase} failed: {}", FirstFailure(.failures))]
    PhaseFailed {
        phase: String,
        failures: Vec<TaskError>,
    },

    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),
}

impl PipelineError {
    /// Task failures carried by a phase abort (empty for other variants).
    pub fn task_failures(&self) -> &[TaskError] {
        match self {
            Self::PhaseFailed { failures, .. } => failures,
            _ => &[],
        }
    }
}

/// Fatal error of one task. Every variant aborts the run after the phase settles.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("task '{task}': cannot read prompt template {path}: {source}")]
    Template {
        task: String,
        path: String,
        source: std::io::Error,
    },

    #[error("task '{task}': {source}")]
    Invoke {
        task: String,
        #[source]
        source: InvokeError,
    },

    #[error("task '{task}': failed to write output: {source}")]
    ArtifactWrite {
        task: String,
        #[source]
        source: ArtifactError,
    },
}

impl TaskError {
    pub fn task(&self) -> &str {
        match self {
            Self::Template { task, .. }
            | Self::Invoke { task, .. }
            | Self::ArtifactWrite { task, .. } => task,
        }
    }
}

struct FirstFailure<'a>(&'a [TaskError]);

impl fmt::Display for FirstFailure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            [] => write!(f, "no task error recorded"),
            [only] => write!(f, "{only}"),
            [first, rest @ ..] => write!(f, "{first} (and {} more)", rest.len()),
        }
    }
}
