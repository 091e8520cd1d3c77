use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::types::AppConfig;

/// Get the per-user data directory: ~/.policy-maker
pub fn get_data_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".policy-maker"))
}

pub fn load_default() -> Result<AppConfig, ConfigError> {
    // Priority 1: ~/.policy-maker/config.toml (highest)
    let user_config = get_data_dir()?.join("config.toml");

    // Priority 2: ./policy-maker.toml (current directory)
    let local_config = Path::new("policy-maker.toml");

    let mut cfg = if user_config.exists() {
        load_from_path(&user_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut cfg);
    Ok(cfg)
}

pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str::<AppConfig>(&s).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

// Environment variable overrides (Priority 0: highest)
fn apply_env_overrides(cfg: &mut AppConfig) {
    if let Ok(v) = std::env::var("POLICY_MAKER_CLI") {
        if !v.trim().is_empty() {
            cfg.agent.cli = Some(v.trim().to_string());
        }
    }
    if let Ok(v) = std::env::var("POLICY_MAKER_LOG") {
        if !v.trim().is_empty() {
            cfg.logging.level = v;
        }
    }
}
