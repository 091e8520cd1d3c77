use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub executor: ExecutorConfig,

    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "policy_maker_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

/// Which agent CLI to drive when neither `--cli` nor the run input names one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub cli: Option<String>,

    /// Appended after the strategy's own arguments.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Upper bound on concurrently running tasks in one phase. 0 = unbounded.
    #[serde(default)]
    pub max_parallel_tasks: usize,

    #[serde(default = "default_progress_bar")]
    pub progress_bar: bool,

    /// "text" or "jsonl"
    #[serde(default = "default_stream_format")]
    pub stream_format: String,

    /// Plain ASCII markers in text output instead of emoji.
    #[serde(default)]
    pub ascii_only: bool,
}

fn default_progress_bar() -> bool {
    true
}

fn default_stream_format() -> String {
    "text".to_string()
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_parallel_tasks: 0,
            progress_bar: default_progress_bar(),
            stream_format: default_stream_format(),
            ascii_only: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Directory (under the project root) that holds one folder per session.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Base directory for prompt templates, relative to the project root.
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,

    /// Pipeline definition (TOML). Unset means the built-in pipeline.
    #[serde(default)]
    pub pipeline_file: Option<String>,
}

fn default_data_dir() -> String {
    ".policy-maker".to_string()
}

fn default_templates_dir() -> String {
    ".".to_string()
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            templates_dir: default_templates_dir(),
            pipeline_file: None,
        }
    }
}
