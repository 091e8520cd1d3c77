use chrono::{SecondsFormat, Utc};

use crate::error::ArtifactError;

use super::store::{join_rel, normalize_dir, ArtifactStore};

/// File names starting with this prefix are synthesized, never task outputs.
pub const SUMMARY_PREFIX: &str = "_";
pub const SUMMARY_FILE_NAME: &str = "_summary.md";

const SOURCE_EXTENSION: &str = ".md";
/// Content lines copied per source before the excerpt is cut.
const EXCERPT_MAX_LINES: usize = 10;
/// A further heading ends the excerpt once more than this many lines are in.
const EXCERPT_HEADING_STOP: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryArtifact {
    /// Relative path of the written summary.
    pub path: String,
    /// Source file names, in the order they were folded in.
    pub sources: Vec<String>,
    pub content: String,
}

/// Fold every task artifact in `dir` into `<dir>/_summary.md`.
///
/// Returns `Ok(None)` without writing when the directory holds no sources.
pub async fn synthesize(
    store: &dyn ArtifactStore,
    dir: &str,
) -> Result<Option<SummaryArtifact>, ArtifactError> {
    let dir = normalize_dir(dir)?;
    let mut sources = Vec::new();
    for path in store.list_siblings(&dir).await? {
        let file_name = path.rsplit('/').next().unwrap_or(path.as_str()).to_string();
        if !is_source(&file_name) {
            continue;
        }
        match store.read(&path).await? {
            Some(content) => sources.push((file_name, content)),
            None => tracing::warn!(artifact = %path, "listed artifact vanished before summary"),
        }
    }

    if sources.is_empty() {
        tracing::warn!(dir = %dir, "no artifacts to summarize");
        return Ok(None);
    }

    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let content = render_summary(&timestamp, &sources);
    let path = join_rel(&dir, SUMMARY_FILE_NAME);
    store.write(&path, &content).await?;
    tracing::info!(summary = %path, sources = sources.len(), "summary written");

    Ok(Some(SummaryArtifact {
        path,
        sources: sources.into_iter().map(|(name, _)| name).collect(),
        content,
    }))
}

fn is_source(file_name: &str) -> bool {
    file_name.ends_with(SOURCE_EXTENSION) && !file_name.starts_with(SUMMARY_PREFIX)
}

/// Render the summary document for `(file name, content)` pairs.
pub fn render_summary(timestamp: &str, sources: &[(String, String)]) -> String {
    let mut out = String::new();
    out.push_str("---\ngenerated: true\n");
    out.push_str(&format!("timestamp: {timestamp}\n"));
    out.push_str("sources:\n");
    for (name, _) in sources {
        out.push_str(&format!("  - {name}\n"));
    }
    out.push_str("---\n\n# Summary\n\n");

    for (name, content) in sources {
        let stem = name.strip_suffix(SOURCE_EXTENSION).unwrap_or(name);
        out.push_str(&format!("## {stem}\n\n"));
        for line in extract_excerpt(content) {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("\n---\n\n");
    }
    out
}

/// Leading excerpt of one artifact: from its first `#`/`##` heading, at most
/// ten non-blank content lines. Headings and blank lines are kept but not
/// counted.
pub fn extract_excerpt(content: &str) -> Vec<&str> {
    let mut excerpt = Vec::new();
    let mut extracting = false;
    let mut copied = 0usize;

    for line in content.lines() {
        if is_heading(line) {
            if extracting && copied > EXCERPT_HEADING_STOP {
                break;
            }
            extracting = true;
            excerpt.push(line);
            continue;
        }
        if !extracting {
            continue;
        }
        excerpt.push(line);
        if line.trim().is_empty() {
            continue;
        }
        copied += 1;
        if copied >= EXCERPT_MAX_LINES {
            break;
        }
    }
    excerpt
}

fn is_heading(line: &str) -> bool {
    line.starts_with("# ") || line.starts_with("## ")
}
