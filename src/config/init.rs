// ABOUTME: Config scaffolding for new sites.
// ABOUTME: Writes a deploy_config.json template with a few common security headers.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Port;

use super::{CONFIG_FILENAME, Config};

/// Write a template config into `dir`, returning its path.
pub fn init_config(dir: &Path, port: Option<u16>, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(p) = port {
        config.server.port = Port::try_from(p).map_err(|e| Error::InvalidConfig(e.to_string()))?;
    }

    let mut json = serde_json::to_string_pretty(&config)?;
    json.push('\n');
    std::fs::write(&config_path, json)?;

    Ok(config_path)
}
