pub mod artifact;
#[allow(clippy::module_inception)]
pub mod error;
pub mod executor;
pub mod invoke;

pub use artifact::ArtifactError;
pub use error::{CliError, ConfigError};
pub use executor::{PipelineError, TaskError};
pub use invoke::InvokeError;
