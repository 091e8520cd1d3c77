use std::collections::{HashMap, HashSet};

use crate::artifact::{normalize_path, SUMMARY_PREFIX};
use crate::error::PipelineError;

use super::types::{PipelineDef, VarSource};

impl PipelineDef {
    /// Definition-time checks. Nothing here is re-checked while running.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.phases.is_empty() {
            return Err(invalid("pipeline has no phases".to_string()));
        }

        // normalized output path -> (phase index, task name)
        let mut outputs: HashMap<String, (usize, String)> = HashMap::new();

        for (phase_idx, phase) in self.phases.iter().enumerate() {
            if phase.tasks.is_empty() {
                return Err(invalid(format!("phase '{}' has no tasks", phase.name)));
            }

            if let Some(dir) = &phase.summary_dir {
                normalize_path(dir).map_err(|e| {
                    invalid(format!("phase '{}' summary_dir: {e}", phase.name))
                })?;
            }

            let mut names = HashSet::new();
            for task in &phase.tasks {
                if !names.insert(task.name.as_str()) {
                    return Err(invalid(format!(
                        "duplicate task name '{}' in phase '{}'",
                        task.name, phase.name
                    )));
                }

                let output = normalize_path(&task.output_file)
                    .map_err(|e| invalid(format!("task '{}' output_file: {e}", task.name)))?;
                let file_name = output.rsplit('/').next().unwrap_or(output.as_str());
                if file_name.starts_with(SUMMARY_PREFIX) {
                    return Err(invalid(format!(
                        "task '{}' output '{}' uses the reserved '{}' prefix",
                        task.name, task.output_file, SUMMARY_PREFIX
                    )));
                }

                if let Some((_, other)) = outputs.get(&output) {
                    return Err(invalid(format!(
                        "tasks '{}' and '{}' both write '{}'",
                        other, task.name, task.output_file
                    )));
                }
                outputs.insert(output, (phase_idx, task.name.clone()));
            }
        }

        // Same-phase reads would race the sibling that writes the artifact.
        for (phase_idx, phase) in self.phases.iter().enumerate() {
            for task in &phase.tasks {
                for (placeholder, source) in &task.vars {
                    let VarSource::Artifact(path) = source else {
                        continue;
                    };
                    let path = normalize_path(path).map_err(|e| {
                        invalid(format!("task '{}' variable {placeholder}: {e}", task.name))
                    })?;
                    if let Some((writer_phase, writer)) = outputs.get(&path) {
                        if *writer_phase == phase_idx {
                            return Err(invalid(format!(
                                "task '{}' reads '{}' written by '{}' in the same phase '{}'",
                                task.name, path, writer, phase.name
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

fn invalid(msg: String) -> PipelineError {
    PipelineError::InvalidDefinition(msg)
}
