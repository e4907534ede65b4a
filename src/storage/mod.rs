//! Storage Layer
//!
//! Resolves the per-user directories the studio reads and writes.

use anyhow::Result;
use std::path::PathBuf;

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "streamstudio";
const APPLICATION: &str = "StreamStudio";

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = project_dirs()?.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;
    Ok(config_dir)
}

/// Default location of `config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}
