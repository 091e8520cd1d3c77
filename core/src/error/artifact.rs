use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("invalid artifact path: {0}")]
    InvalidPath(String),

    #[error("artifact io error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl ArtifactError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
