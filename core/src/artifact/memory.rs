use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::ArtifactError;

use super::store::{join_rel, normalize_dir, normalize_path, ArtifactStore};

/// In-process artifact store. Same contract as the filesystem store; nothing
/// outlives the value.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    blobs: RwLock<BTreeMap<String, String>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    pub async fn paths(&self) -> Vec<String> {
        self.blobs.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn write(&self, path: &str, content: &str) -> Result<(), ArtifactError> {
        let rel = normalize_path(path)?;
        self.blobs.write().await.insert(rel, content.to_string());
        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Option<String>, ArtifactError> {
        let rel = normalize_path(path)?;
        Ok(self.blobs.read().await.get(&rel).cloned())
    }

    async fn list_siblings(&self, dir: &str) -> Result<Vec<String>, ArtifactError> {
        let rel = normalize_dir(dir)?;
        let prefix = join_rel(&rel, "");
        let blobs = self.blobs.read().await;
        Ok(blobs
            .keys()
            .filter_map(|key| key.strip_prefix(prefix.as_str()))
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(|name| join_rel(&rel, name))
            .collect())
    }
}
