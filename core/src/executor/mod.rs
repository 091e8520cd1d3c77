//! Phase scheduler for a static pipeline.
//!
//! # Architecture
//!
//! ```text
//! PipelineDef
//!   ↓
//! PipelineDef::validate()
//!   ↓
//! for each phase (sequential):
//!     execute_phase_parallel()   every task: resolve → template → prompt → agent → artifact
//!       ↓ joint wait: all outcomes collected
//!     any failure → PipelineError::PhaseFailed
//!     fan-in phase → synthesize(summary_dir)
//!   ↓
//! RunReport
//! ```

mod engine;
mod plan;
mod progress;
mod scheduler;
pub mod traits;
pub mod types;

pub use engine::{PhaseScheduler, PhaseSchedulerBuilder};
pub use plan::{plan_dry_run, DryRunPlan, PhasePlan, TaskPlan};
pub use progress::ProgressMonitor;
pub use scheduler::execute_phase_parallel;
pub use traits::{OutputRendererPlugin, RenderEvent};
pub use types::{ExecutionOpts, PhaseReport, RunContext, RunReport, TaskReport};
