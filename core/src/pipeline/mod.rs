//! Static pipeline definitions: phases of tasks with typed variable bindings.
//!
//! A pipeline is either the built-in policy review pipeline or a TOML file:
//!
//! ```toml
//! [[phases]]
//! name = "Phase 1: Domain Strategist"
//!
//! [[phases.tasks]]
//! name = "domain-strategist"
//! prompt_file = "expert/domain-strategist/prompt.md"
//! output_file = "R1/domain_charter.md"
//! vars = { SERVICE_ONE_LINER = "input", CONTEXT = "computed" }
//! ```

mod builtin;
mod types;
mod validate;

use std::path::Path;

use crate::error::ConfigError;

pub use builtin::{builtin_pipeline, ATTACKER_DIR, DOMAIN_CHARTER, EXPERT_DIR};
pub use types::{PhaseDef, PipelineDef, TaskDef, VarSource};

impl PipelineDef {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn task_count(&self) -> usize {
        self.phases.iter().map(|p| p.tasks.len()).sum()
    }
}

/// Load a pipeline definition file. Validation is left to the caller.
pub fn load_pipeline(path: &Path) -> Result<PipelineDef, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    PipelineDef::from_toml_str(&s).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_PHASES: &str = r#"
[[phases]]
name = "Draft"

[[phases.tasks]]
name = "writer"
prompt_file = "writer.md"
output_file = "draft/charter.md"
vars = { NAME = "input:SERVICE_ONE_LINER", CONTEXT = "computed" }

[[phases]]
name = "Review"
summary_dir = "review"

[[phases.tasks]]
name = "critic"
prompt_file = "critic.md"
output_file = "review/critic.md"
vars = { CHARTER = "artifact:draft/charter.md", NOTES = "empty" }
"#;

    #[test]
    fn test_pipeline_from_toml() {
        let pipeline = PipelineDef::from_toml_str(TWO_PHASES).unwrap();
        assert_eq!(pipeline.phases.len(), 2);
        assert_eq!(pipeline.task_count(), 2);
        assert!(!pipeline.phases[0].is_fan_in());
        assert_eq!(pipeline.phases[1].summary_dir.as_deref(), Some("review"));
        assert_eq!(
            pipeline.phases[0].tasks[0].vars["NAME"],
            VarSource::Direct("SERVICE_ONE_LINER".to_string())
        );
        pipeline.validate().unwrap();
    }

    #[test]
    fn test_builtin_survives_toml_round_trip() {
        let builtin = builtin_pipeline();
        let text = toml::to_string(&builtin).unwrap();
        assert_eq!(PipelineDef::from_toml_str(&text).unwrap(), builtin);
    }

    #[test]
    fn test_load_pipeline_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        std::fs::write(&path, TWO_PHASES).unwrap();
        let pipeline = load_pipeline(&path).unwrap();
        assert_eq!(pipeline.phases[1].tasks[0].name, "critic");
    }
}
