use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Ordered list of phases. Static for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineDef {
    pub phases: Vec<PhaseDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDef {
    pub name: String,

    /// Artifact directory folded into a summary once this phase completes.
    /// Setting it makes the phase a fan-in phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_dir: Option<String>,

    pub tasks: Vec<TaskDef>,
}

impl PhaseDef {
    pub fn is_fan_in(&self) -> bool {
        self.summary_dir.is_some()
    }
}

/// One agent invocation: template in, artifact out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTaskDef", into = "RawTaskDef")]
pub struct TaskDef {
    pub name: String,
    /// Template path, relative to the templates directory.
    pub prompt_file: String,
    /// Artifact path, relative to the run's artifact root.
    pub output_file: String,
    /// Placeholder name -> where its value comes from, in authored order.
    pub vars: IndexMap<String, VarSource>,
}

/// Origin of a placeholder's value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VarSource {
    /// Read `key` from the run input.
    Direct(String),
    /// The run's precomputed service context.
    Computed,
    /// Fixed "not supplied this round" marker.
    Empty,
    /// Current content of an artifact, relative to the artifact root.
    Artifact(String),
}

impl VarSource {
    /// Parse the string encoding used in pipeline files. `placeholder` is the
    /// variable name the source is bound to; a bare `input` reads that key.
    pub fn parse(placeholder: &str, encoded: &str) -> Result<Self, ConfigError> {
        let encoded = encoded.trim();
        match encoded {
            "input" => Ok(Self::Direct(placeholder.to_string())),
            "computed" => Ok(Self::Computed),
            "empty" => Ok(Self::Empty),
            _ => {
                if let Some(key) = encoded.strip_prefix("input:") {
                    let key = key.trim();
                    if !key.is_empty() {
                        return Ok(Self::Direct(key.to_string()));
                    }
                } else if let Some(path) = encoded.strip_prefix("artifact:") {
                    let path = path.trim();
                    if !path.is_empty() {
                        return Ok(Self::Artifact(path.to_string()));
                    }
                }
                Err(ConfigError::InvalidVarSource(encoded.to_string()))
            }
        }
    }

    /// Inverse of [`VarSource::parse`].
    pub fn encode(&self, placeholder: &str) -> String {
        match self {
            Self::Direct(key) if key == placeholder => "input".to_string(),
            Self::Direct(key) => format!("input:{key}"),
            Self::Computed => "computed".to_string(),
            Self::Empty => "empty".to_string(),
            Self::Artifact(path) => format!("artifact:{path}"),
        }
    }
}

impl fmt::Display for VarSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(key) => write!(f, "input:{key}"),
            Self::Computed => write!(f, "computed"),
            Self::Empty => write!(f, "empty"),
            Self::Artifact(path) => write!(f, "artifact:{path}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawTaskDef {
    name: String,
    prompt_file: String,
    output_file: String,
    #[serde(default)]
    vars: IndexMap<String, String>,
}

impl TryFrom<RawTaskDef> for TaskDef {
    type Error = ConfigError;

    fn try_from(raw: RawTaskDef) -> Result<Self, Self::Error> {
        let mut vars = IndexMap::with_capacity(raw.vars.len());
        for (placeholder, encoded) in raw.vars {
            let source = VarSource::parse(&placeholder, &encoded)?;
            vars.insert(placeholder, source);
        }
        Ok(Self {
            name: raw.name,
            prompt_file: raw.prompt_file,
            output_file: raw.output_file,
            vars,
        })
    }
}

impl From<TaskDef> for RawTaskDef {
    fn from(task: TaskDef) -> Self {
        let vars = task
            .vars
            .iter()
            .map(|(placeholder, source)| (placeholder.clone(), source.encode(placeholder)))
            .collect();
        Self {
            name: task.name,
            prompt_file: task.prompt_file,
            output_file: task.output_file,
            vars,
        }
    }
}
