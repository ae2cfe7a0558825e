// ABOUTME: Where new content comes from and where rollout state is kept.
// ABOUTME: Source tree, backups directory, extra excludes and log file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeployConfig {
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,

    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("deploy_backups")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("deploy.log")
}

impl Default for DeployConfig {
    fn default() -> Self {
        DeployConfig {
            source_dir: default_source_dir(),
            backup_dir: default_backup_dir(),
            exclude: Vec::new(),
            log_file: default_log_file(),
        }
    }
}
