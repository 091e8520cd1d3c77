use std::path::PathBuf;
use std::sync::Arc;

use crate::artifact::ArtifactStore;
use crate::session::{build_service_context, RunInput};

/// Read-only state shared by every task of a run.
#[derive(Clone)]
pub struct RunContext {
    pub session_id: String,
    pub input: Arc<RunInput>,
    /// Derived once from `input`; handed verbatim to `computed` bindings.
    pub computed_context: Arc<str>,
    pub store: Arc<dyn ArtifactStore>,
    /// Directory prompt templates are resolved against.
    pub templates_root: PathBuf,
}

impl RunContext {
    pub fn new(
        session_id: impl Into<String>,
        input: RunInput,
        store: Arc<dyn ArtifactStore>,
        templates_root: impl Into<PathBuf>,
    ) -> Self {
        let computed_context: Arc<str> = build_service_context(&input).into();
        Self {
            session_id: session_id.into(),
            input: Arc::new(input),
            computed_context,
            store,
            templates_root: templates_root.into(),
        }
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("session_id", &self.session_id)
            .field("store", &self.store.name())
            .field("templates_root", &self.templates_root)
            .finish_non_exhaustive()
    }
}
