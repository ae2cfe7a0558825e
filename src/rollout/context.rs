// ABOUTME: Everything a rollout needs, built once by the caller and passed by reference.
// ABOUTME: Bundles the config with the snapshot store, exclude set and health verifier.

use hyper::HeaderMap;
use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::health::{HealthVerifier, health_url};
use crate::publish::ExcludeSet;
use crate::snapshot::SnapshotStore;

#[derive(Debug, Clone)]
pub struct RolloutContext {
    config: Config,
    store: SnapshotStore,
    exclude: ExcludeSet,
    verifier: HealthVerifier,
    headers: HeaderMap,
}

impl RolloutContext {
    pub fn new(config: Config) -> Result<Self> {
        let headers = config
            .security
            .header_map()
            .map_err(|e| Error::InvalidConfig(format!("security.headers: {e}")))?;

        Ok(Self {
            store: SnapshotStore::new(&config.deploy.backup_dir),
            exclude: ExcludeSet::from_config(&config),
            verifier: HealthVerifier::from_config(&config.health_check),
            headers,
            config,
        })
    }

    pub fn with_verifier(mut self, verifier: HealthVerifier) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn content_root(&self) -> &Path {
        &self.config.server.root_dir
    }

    pub fn source_dir(&self) -> &Path {
        &self.config.deploy.source_dir
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn exclude(&self) -> &ExcludeSet {
        &self.exclude
    }

    pub fn verifier(&self) -> &HealthVerifier {
        &self.verifier
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn health_url(&self) -> String {
        health_url(
            &self.config.server.host,
            self.config.server.port,
            &self.config.health_check.endpoint,
        )
    }
}
