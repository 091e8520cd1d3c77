use indexmap::IndexMap;

use crate::artifact::ArtifactStore;
use crate::pipeline::VarSource;
use crate::session::{RunInput, NOT_AVAILABLE};

/// Value bound to an `Empty` source.
pub const EMPTY_PLACEHOLDER: &str = "(이번 라운드에서는 제공되지 않음)";
/// Value bound to an artifact that does not exist (yet).
pub const NOT_GENERATED_PLACEHOLDER: &str = "(아직 생성되지 않음)";

/// Placeholder name -> text, in binding order.
pub type ResolvedVars = IndexMap<String, String>;

/// Outcome of resolving one binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Value(String),
    /// Valid but degraded: the fixed marker text stands in for the value.
    Placeholder(PlaceholderKind),
    /// The store could not be read. Never surfaces past [`resolve_variables`].
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    NotAvailable,
    NotSupplied,
    NotGenerated,
}

impl PlaceholderKind {
    pub fn text(self) -> &'static str {
        match self {
            Self::NotAvailable => NOT_AVAILABLE,
            Self::NotSupplied => EMPTY_PLACEHOLDER,
            Self::NotGenerated => NOT_GENERATED_PLACEHOLDER,
        }
    }
}

impl Resolution {
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Self::Value(_))
    }

    /// Text substituted into the prompt. A failed artifact read reads as
    /// "not generated".
    pub fn into_text(self) -> String {
        match self {
            Self::Value(v) => v,
            Self::Placeholder(kind) => kind.text().to_string(),
            Self::Failed(_) => NOT_GENERATED_PLACEHOLDER.to_string(),
        }
    }
}

/// Resolve a single binding. Never writes to the store.
pub async fn resolve_binding(
    source: &VarSource,
    input: &RunInput,
    computed_context: &str,
    store: &dyn ArtifactStore,
) -> Resolution {
    match source {
        VarSource::Direct(key) => match input.non_empty(key) {
            Some(v) => Resolution::Value(v.to_string()),
            None => Resolution::Placeholder(PlaceholderKind::NotAvailable),
        },
        VarSource::Computed => Resolution::Value(computed_context.to_string()),
        VarSource::Empty => Resolution::Placeholder(PlaceholderKind::NotSupplied),
        VarSource::Artifact(path) => match store.read(path).await {
            Ok(Some(content)) => Resolution::Value(content),
            Ok(None) => Resolution::Placeholder(PlaceholderKind::NotGenerated),
            Err(e) => Resolution::Failed(e.to_string()),
        },
    }
}

/// Resolve every binding of a task, independently of one another.
pub async fn resolve_variables(
    vars: &IndexMap<String, VarSource>,
    input: &RunInput,
    computed_context: &str,
    store: &dyn ArtifactStore,
) -> ResolvedVars {
    let mut resolved = ResolvedVars::with_capacity(vars.len());
    for (name, source) in vars {
        let resolution = resolve_binding(source, input, computed_context, store).await;
        match &resolution {
            Resolution::Failed(reason) => {
                tracing::warn!(var = %name, source = %source, reason = %reason, "artifact unreadable, using placeholder")
            }
            Resolution::Placeholder(kind) => {
                tracing::debug!(var = %name, source = %source, ?kind, "placeholder value")
            }
            Resolution::Value(v) => tracing::debug!(var = %name, source = %source, len = v.len(), "resolved"),
        }
        resolved.insert(name.clone(), resolution.into_text());
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{FsArtifactStore, MemoryArtifactStore};

    fn bindings(items: &[(&str, VarSource)]) -> IndexMap<String, VarSource> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_direct_and_computed_are_never_empty() {
        let store = MemoryArtifactStore::new();
        let input: RunInput = [("PRESENT", "value"), ("BLANK", ""), ("SPACES", "  ")]
            .into_iter()
            .collect();
        let vars = bindings(&[
            ("PRESENT", VarSource::Direct("PRESENT".into())),
            ("BLANK", VarSource::Direct("BLANK".into())),
            ("SPACES", VarSource::Direct("SPACES".into())),
            ("MISSING", VarSource::Direct("NOPE".into())),
            ("CTX", VarSource::Computed),
        ]);

        let resolved = resolve_variables(&vars, &input, "ctx line", &store).await;

        assert_eq!(resolved.len(), vars.len());
        assert!(resolved.values().all(|v| !v.is_empty()));
        assert_eq!(resolved["PRESENT"], "value");
        assert_eq!(resolved["BLANK"], "N/A");
        assert_eq!(resolved["SPACES"], "  ");
        assert_eq!(resolved["MISSING"], "N/A");
        assert_eq!(resolved["CTX"], "ctx line");
    }

    #[tokio::test]
    async fn test_missing_artifact_resolves_to_placeholder() {
        let store = MemoryArtifactStore::new();
        store.write("R1/domain_charter.md", "charter body").await.unwrap();
        let vars = bindings(&[
            ("CHARTER", VarSource::Artifact("R1/domain_charter.md".into())),
            ("LATER", VarSource::Artifact("R2/not_yet.md".into())),
            ("BREACH", VarSource::Empty),
        ]);

        let resolved = resolve_variables(&vars, &RunInput::default(), "", &store).await;

        assert_eq!(resolved["CHARTER"], "charter body");
        assert_eq!(resolved["LATER"], NOT_GENERATED_PLACEHOLDER);
        assert_eq!(resolved["BREACH"], EMPTY_PLACEHOLDER);
        let order: Vec<&str> = resolved.keys().map(String::as_str).collect();
        assert_eq!(order, ["CHARTER", "LATER", "BREACH"]);
    }

    #[tokio::test]
    async fn test_unreadable_artifact_is_a_failed_resolution() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where a file is expected cannot be read as text
        std::fs::create_dir_all(dir.path().join("R1/expert/_summary.md")).unwrap();
        let store = FsArtifactStore::new(dir.path());
        let source = VarSource::Artifact("R1/expert/_summary.md".into());

        let resolution = resolve_binding(&source, &RunInput::default(), "", &store).await;
        assert!(matches!(resolution, Resolution::Failed(_)));
        assert!(resolution.is_degraded());
        assert_eq!(resolution.into_text(), NOT_GENERATED_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_escaping_artifact_path_degrades_instead_of_reading() {
        let store = MemoryArtifactStore::new();
        let vars = bindings(&[("X", VarSource::Artifact("../secret.md".into()))]);
        let resolved = resolve_variables(&vars, &RunInput::default(), "", &store).await;
        assert_eq!(resolved["X"], NOT_GENERATED_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_resolution_does_not_write() {
        let store = MemoryArtifactStore::new();
        let vars = bindings(&[("A", VarSource::Artifact("x/a.md".into()))]);
        resolve_variables(&vars, &RunInput::default(), "", &store).await;
        assert!(store.is_empty().await);
    }
}
