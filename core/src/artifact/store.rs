use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::error::ArtifactError;

/// Run-scoped named-blob store. Paths are `/`-separated and relative to the
/// store root; there is no delete or versioning operation.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    fn name(&self) -> &str;

    /// Store `content` under `path`, creating parents and replacing any prior value.
    async fn write(&self, path: &str, content: &str) -> Result<(), ArtifactError>;

    /// `Ok(None)` when nothing is stored under `path`.
    async fn read(&self, path: &str) -> Result<Option<String>, ArtifactError>;

    /// Immediate child artifacts of `dir`, as full relative paths sorted by name.
    /// A missing directory has no children.
    async fn list_siblings(&self, dir: &str) -> Result<Vec<String>, ArtifactError>;
}

/// Normalize a store-relative artifact path: `\` becomes `/`, empty and `.`
/// segments are dropped. Absolute paths and `..` are rejected.
pub fn normalize_path(path: &str) -> Result<String, ArtifactError> {
    let normalized = normalize(path)?;
    if normalized.is_empty() {
        return Err(ArtifactError::InvalidPath(path.to_string()));
    }
    Ok(normalized)
}

/// Like [`normalize_path`] but the empty path (store root) is allowed.
pub fn normalize_dir(dir: &str) -> Result<String, ArtifactError> {
    normalize(dir)
}

fn normalize(path: &str) -> Result<String, ArtifactError> {
    let unified = path.replace('\\', "/");
    if unified.starts_with('/') || Path::new(&unified).is_absolute() || has_drive_prefix(&unified) {
        return Err(ArtifactError::InvalidPath(path.to_string()));
    }

    let mut segments = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(ArtifactError::InvalidPath(path.to_string())),
            s => segments.push(s),
        }
    }
    Ok(segments.join("/"))
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Artifact store backed by one directory on disk.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a relative artifact path.
    pub fn locate(&self, path: &str) -> Result<PathBuf, ArtifactError> {
        let rel = normalize_path(path)?;
        Ok(self.join(&rel))
    }

    fn join(&self, rel: &str) -> PathBuf {
        let mut full = self.root.clone();
        for segment in rel.split('/').filter(|s| !s.is_empty()) {
            full.push(segment);
        }
        debug_assert!(full
            .components()
            .all(|c| !matches!(c, Component::ParentDir)));
        full
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    fn name(&self) -> &str {
        "fs"
    }

    async fn write(&self, path: &str, content: &str) -> Result<(), ArtifactError> {
        let rel = normalize_path(path)?;
        let full = self.join(&rel);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ArtifactError::io(parent.display().to_string(), e))?;
        }
        tokio::fs::write(&full, content)
            .await
            .map_err(|e| ArtifactError::io(full.display().to_string(), e))?;
        tracing::debug!(artifact = %rel, bytes = content.len(), "artifact written");
        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Option<String>, ArtifactError> {
        let rel = normalize_path(path)?;
        let full = self.join(&rel);
        match tokio::fs::read_to_string(&full).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ArtifactError::io(full.display().to_string(), e)),
        }
    }

    async fn list_siblings(&self, dir: &str) -> Result<Vec<String>, ArtifactError> {
        let rel = normalize_dir(dir)?;
        let full = self.join(&rel);

        let mut entries = match tokio::fs::read_dir(&full).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ArtifactError::io(full.display().to_string(), e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ArtifactError::io(full.display().to_string(), e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| ArtifactError::io(entry.path().display().to_string(), e))?;
            if !file_type.is_file() {
                continue;
            }
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();

        Ok(names
            .into_iter()
            .map(|name| join_rel(&rel, &name))
            .collect())
    }
}

pub(crate) fn join_rel(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("R1/expert/a.md").unwrap(), "R1/expert/a.md");
        assert_eq!(normalize_path("./R1//expert/./a.md").unwrap(), "R1/expert/a.md");
        assert_eq!(normalize_path("R1\\expert\\a.md").unwrap(), "R1/expert/a.md");
        assert!(normalize_path("").is_err());
        assert!(normalize_path("/etc/passwd").is_err());
        assert!(normalize_path("C:/x.md").is_err());
        assert!(normalize_path("R1/../../x.md").is_err());
        assert_eq!(normalize_dir("").unwrap(), "");
    }

    #[tokio::test]
    async fn test_write_creates_parents_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());

        store.write("R1/expert/a.md", "first").await.unwrap();
        store.write("R1/expert/a.md", "second").await.unwrap();

        let on_disk = std::fs::read_to_string(dir.path().join("R1/expert/a.md")).unwrap();
        assert_eq!(on_disk, "second");
        assert_eq!(
            store.read("R1/expert/a.md").await.unwrap().as_deref(),
            Some("second")
        );
    }

    #[tokio::test]
    async fn test_read_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        assert_eq!(store.read("R1/nope.md").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_siblings_only_immediate_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        store.write("R1/expert/b.md", "b").await.unwrap();
        store.write("R1/expert/a.md", "a").await.unwrap();
        store.write("R1/expert/nested/c.md", "c").await.unwrap();

        let siblings = store.list_siblings("R1/expert").await.unwrap();
        assert_eq!(siblings, ["R1/expert/a.md", "R1/expert/b.md"]);

        assert!(store.list_siblings("R1/absent").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path().join("artifacts"));
        let err = store.write("../outside.md", "x").await.unwrap_err();
        assert!(matches!(err, ArtifactError::InvalidPath(_)));
        assert!(!dir.path().join("outside.md").exists());
    }
}
