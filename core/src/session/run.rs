use std::path::{Path, PathBuf};

use crate::artifact::FsArtifactStore;
use crate::error::ArtifactError;

use super::id_gen::generate_session_id;
use super::input::RunInput;

pub const ARTIFACTS_DIR_NAME: &str = "artifacts";
pub const INPUT_BACKUP_FILE_NAME: &str = "input.json";

/// On-disk home of one run: `<root>/<data_dir>/<session_id>/`.
#[derive(Debug, Clone)]
pub struct RunSession {
    id: String,
    dir: PathBuf,
}

impl RunSession {
    /// Create the session directory with its `artifacts/` subdirectory and
    /// back up the run input next to it.
    pub async fn create(
        project_root: &Path,
        data_dir_name: &str,
        input: &RunInput,
    ) -> Result<Self, ArtifactError> {
        let id = generate_session_id();
        let dir = project_root.join(data_dir_name).join(&id);
        let session = Self { id, dir };

        let artifacts = session.artifacts_dir();
        tokio::fs::create_dir_all(&artifacts)
            .await
            .map_err(|e| ArtifactError::io(artifacts.display().to_string(), e))?;

        let backup = session.dir.join(INPUT_BACKUP_FILE_NAME);
        tokio::fs::write(&backup, input.to_pretty_json())
            .await
            .map_err(|e| ArtifactError::io(backup.display().to_string(), e))?;

        tracing::info!(session_id = %session.id, dir = %session.dir.display(), "session created");
        Ok(session)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.dir.join(ARTIFACTS_DIR_NAME)
    }

    pub fn store(&self) -> FsArtifactStore {
        FsArtifactStore::new(self.artifacts_dir())
    }
}
