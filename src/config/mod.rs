// ABOUTME: Configuration types and parsing for deploy_config.json (or deploy.yml).
// ABOUTME: Handles discovery, JSON/YAML parsing, validation and the init template.

mod deploy;
mod deserialize;
mod health_check;
mod init;
mod security;
mod server;

pub use deploy::DeployConfig;
pub use health_check::HealthCheckConfig;
pub use init::init_config;
pub use security::SecurityConfig;
pub use server::{ServerConfig, client_host};

use crate::error::{Error, Result};
use crate::types::Port;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "deploy_config.json";
pub const CONFIG_FILENAME_YAML: &str = "deploy.yml";
pub const CONFIG_FILENAME_YAML_ALT: &str = "deploy.yaml";

/// Every name a config file may be discovered under, in lookup order.
pub const CONFIG_FILENAMES: [&str; 3] = [
    CONFIG_FILENAME,
    CONFIG_FILENAME_YAML,
    CONFIG_FILENAME_YAML_ALT,
];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,

    #[serde(default)]
    pub health_check: HealthCheckConfig,

    #[serde(default)]
    pub security: SecurityConfig,

    #[serde(default)]
    pub deploy: DeployConfig,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, choosing the parser from its extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml") | Some("yaml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        for name in CONFIG_FILENAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Check invariants serde cannot express on its own.
    pub fn validate(&self) -> Result<()> {
        if self.server.root_dir.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "server.root_dir cannot be empty".to_string(),
            ));
        }

        if !self.health_check.endpoint.starts_with('/') {
            return Err(Error::InvalidConfig(format!(
                "health_check.endpoint must start with '/': {}",
                self.health_check.endpoint
            )));
        }

        if self.health_check.timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "health_check.timeout must be greater than zero".to_string(),
            ));
        }

        self.security
            .header_map()
            .map_err(|e| Error::InvalidConfig(format!("security.headers: {e}")))?;

        Ok(())
    }

    /// Names the publisher must never copy into the content root.
    ///
    /// Covers the rollout's own state (content root, backups, log, config
    /// files), tooling metadata, and whatever the config adds.
    pub fn exclude_names(&self) -> Vec<String> {
        let mut names: Vec<String> = [".git", ".vscode", "__pycache__", "target"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        names.extend(CONFIG_FILENAMES.iter().map(|s| s.to_string()));

        for path in [
            &self.server.root_dir,
            &self.deploy.backup_dir,
            &self.deploy.log_file,
        ] {
            if let Some(name) = file_name(path) {
                names.push(name);
            }
        }

        names.extend(self.deploy.exclude.iter().cloned());
        names
    }

    /// A minimal working config used by `init` and tests.
    pub fn template() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("X-Content-Type-Options".to_string(), "nosniff".to_string());
        headers.insert("X-Frame-Options".to_string(), "DENY".to_string());
        headers.insert(
            "Referrer-Policy".to_string(),
            "strict-origin-when-cross-origin".to_string(),
        );

        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: Port::DEV_SERVER,
                root_dir: PathBuf::from("www"),
            },
            health_check: HealthCheckConfig {
                endpoint: "/".to_string(),
                retries: 3,
                timeout: Duration::from_secs(5),
            },
            security: SecurityConfig { headers },
            deploy: DeployConfig::default(),
        }
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_string())
}
