//! Per-run state: input record, computed context, session id and directory.

mod context;
mod id_gen;
mod input;
mod run;

pub use context::{build_service_context, NOT_AVAILABLE};
pub use id_gen::generate_session_id;
pub use input::RunInput;
pub use run::{RunSession, ARTIFACTS_DIR_NAME, INPUT_BACKUP_FILE_NAME};
