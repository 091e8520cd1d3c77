use std::path::{Path, PathBuf};

/// Walk up from `start` to the first directory containing `.git`.
///
/// Falls back to `start` itself when no ancestor is a repository.
pub fn find_project_root(start: &Path) -> PathBuf {
    let start = start
        .canonicalize()
        .unwrap_or_else(|_| start.to_path_buf());

    for dir in start.ancestors() {
        if dir.join(".git").exists() {
            return dir.to_path_buf();
        }
    }

    tracing::warn!(start = %start.display(), "no .git found in any parent; using start dir as project root");
    start
}
