//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `policy_maker_core::api` instead of reaching into internal modules.

pub use crate::artifact::{
    synthesize, ArtifactStore, FsArtifactStore, MemoryArtifactStore, SummaryArtifact,
    SUMMARY_FILE_NAME,
};
pub use crate::config::{
    get_data_dir, load_default, load_from_path, AgentConfig, AppConfig, ExecutorConfig,
    LoggingConfig, WorkspaceConfig,
};
pub use crate::error::{
    ArtifactError, CliError, ConfigError, InvokeError, PipelineError, TaskError,
};
pub use crate::executor::{
    plan_dry_run, DryRunPlan, ExecutionOpts, OutputRendererPlugin, PhaseReport, PhaseScheduler,
    RenderEvent, RunContext, RunReport, TaskReport,
};
pub use crate::pipeline::{
    builtin_pipeline, load_pipeline, PhaseDef, PipelineDef, TaskDef, VarSource,
};
pub use crate::prompt::{build_prompt, resolve_variables, ResolvedVars};
pub use crate::runner::AgentInvoker;
pub use crate::session::{build_service_context, generate_session_id, RunInput, RunSession};
pub use crate::util::find_project_root;
