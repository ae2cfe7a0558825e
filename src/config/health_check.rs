// ABOUTME: Health check parameters for post-deploy verification.
// ABOUTME: Endpoint path, per-attempt timeout and bounded retry count.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::deserialize::{deserialize_duration, serialize_seconds};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthCheckConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(
        default = "default_timeout",
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_seconds"
    )]
    pub timeout: Duration,
}

fn default_endpoint() -> String {
    "/".to_string()
}

fn default_retries() -> u32 {
    3
}

fn default_timeout() -> Duration {
    Duration::from_secs(5)
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        HealthCheckConfig {
            endpoint: default_endpoint(),
            retries: default_retries(),
            timeout: default_timeout(),
        }
    }
}
