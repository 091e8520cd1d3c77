use std::path::{Path, PathBuf};

/// Location of a prompt template under the templates root.
pub fn template_path(root: &Path, relative: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in relative.split(['/', '\\']).filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path
}

pub async fn load_template(root: &Path, relative: &str) -> std::io::Result<String> {
    tokio::fs::read_to_string(template_path(root, relative)).await
}
