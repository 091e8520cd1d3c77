//! Run-scoped artifact storage and summary synthesis.

mod memory;
mod store;
mod summary;

pub use memory::MemoryArtifactStore;
pub use store::{normalize_dir, normalize_path, ArtifactStore, FsArtifactStore};
pub use summary::{
    extract_excerpt, render_summary, synthesize, SummaryArtifact, SUMMARY_FILE_NAME,
    SUMMARY_PREFIX,
};
