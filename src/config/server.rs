// ABOUTME: Listener address and content root for the static server.
// ABOUTME: Also maps wildcard bind hosts to a loopback address clients can dial.

use crate::types::Port;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    pub port: Port,

    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("www")
}

/// Wildcard and empty bind hosts are not dialable; use loopback instead.
pub fn client_host(host: &str) -> &str {
    match host {
        "" | "0.0.0.0" => "127.0.0.1",
        "::" | "[::]" => "::1",
        other => other,
    }
}
