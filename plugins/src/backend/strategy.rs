use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

/// How to drive one agent CLI: the binary and the arguments that make it read
/// the prompt from stdin and print plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CliStrategy {
    pub name: &'static str,
    pub bin: &'static str,
    pub args: &'static [&'static str],
}

pub const CLI_STRATEGIES: &[CliStrategy] = &[
    CliStrategy {
        name: "gemini",
        bin: "gemini",
        args: &["-p", " ", "-o", "text"],
    },
    CliStrategy {
        name: "claude",
        bin: "claude",
        args: &["-p", " ", "--output-format", "text"],
    },
    CliStrategy {
        name: "codex",
        bin: "codex",
        args: &["exec", "-"],
    },
    CliStrategy {
        name: "opencode",
        bin: "opencode",
        args: &["run"],
    },
];

pub fn find_strategy(name: &str) -> Option<&'static CliStrategy> {
    let name = name.trim();
    CLI_STRATEGIES
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
}

pub fn supported_clis() -> Vec<&'static str> {
    CLI_STRATEGIES.iter().map(|s| s.name).collect()
}

/// Look up a strategy by name, failing with the list of supported names.
pub fn require_strategy(name: &str) -> Result<&'static CliStrategy> {
    match find_strategy(name) {
        Some(strategy) => Ok(strategy),
        None => bail!(
            "unsupported agent cli '{}' (supported: {})",
            name,
            supported_clis().join(", ")
        ),
    }
}

/// Resolve an executable: an existing absolute path is taken as is, anything
/// else is searched on `PATH`.
pub fn resolve_binary(bin: &str) -> Result<PathBuf> {
    let path = Path::new(bin);
    if path.is_absolute() {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        bail!("agent binary not found: {}", path.display());
    }

    which::which(bin).map_err(|e| anyhow::anyhow!("agent binary '{}' not found on PATH: {}", bin, e))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedCli {
    pub name: &'static str,
    pub path: Option<PathBuf>,
}

impl DetectedCli {
    pub fn is_available(&self) -> bool {
        self.path.is_some()
    }
}

/// Probe every known strategy, in dictionary order.
pub fn detect_clis() -> Vec<DetectedCli> {
    CLI_STRATEGIES
        .iter()
        .map(|s| {
            let path = resolve_binary(s.bin).ok();
            tracing::debug!(cli = s.name, found = path.is_some(), "probed agent cli");
            DetectedCli { name: s.name, path }
        })
        .collect()
}

/// Names of the strategies whose binary resolves.
pub fn detect_available_clis() -> Vec<&'static str> {
    detect_clis()
        .into_iter()
        .filter(DetectedCli::is_available)
        .map(|d| d.name)
        .collect()
}
