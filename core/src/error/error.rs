use thiserror::Error;

use super::executor::PipelineError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("pipeline failed: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("command failed: {0}")]
    Command(String),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("input error: {0}")]
    Input(String),
    #[error("agent cli error: {0}")]
    Agent(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// 11: config / definition / input error
    /// 20: agent binary / IO error
    /// 30: a phase aborted
    /// 50: internal/uncategorized
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Input(_) => 11,
            Self::Pipeline(PipelineError::InvalidDefinition(_)) => 11,
            Self::Pipeline(PipelineError::PhaseFailed { .. }) => 30,
            Self::Pipeline(PipelineError::Artifact(_)) => 20,
            Self::Agent(_) | Self::Io(_) | Self::Command(_) => 20,
            Self::Anyhow(_) => 50,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot determine home directory")]
    NoHomeDir,
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid variable source '{0}' (expected input, input:<KEY>, computed, empty or artifact:<path>)")]
    InvalidVarSource(String),
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("invalid run input: {0}")]
    InvalidInput(String),
}
