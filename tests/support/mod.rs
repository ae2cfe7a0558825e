// ABOUTME: Test support utilities.
// ABOUTME: Tracing setup, free ports, tree builders and tree comparison for integration tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;

use webroll::config::Config;
use webroll::types::Port;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("webroll=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A port nothing listens on right now.
#[allow(dead_code)]
pub fn free_port() -> Port {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    Port::try_from(port).unwrap()
}

/// Write `files` (relative path, contents) under `root`, creating parents.
#[allow(dead_code)]
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, contents) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
}

/// Every file under `root` keyed by relative path, with its bytes.
#[allow(dead_code)]
pub fn read_tree(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}

/// A site layout in a temp dir: `src/` to publish from, `www/` to serve,
/// `backups/` for snapshots.
#[allow(dead_code)]
pub struct Site {
    pub dir: tempfile::TempDir,
}

#[allow(dead_code)]
impl Site {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.path().join("src")
    }

    pub fn root(&self) -> PathBuf {
        self.path().join("www")
    }

    pub fn backups(&self) -> PathBuf {
        self.path().join("backups")
    }

    /// Template config pointed at this layout, on `port`, with a fast health check.
    pub fn config(&self, port: Port) -> Config {
        let mut config = Config::template();
        config.server.port = port;
        config.server.root_dir = self.root();
        config.deploy.source_dir = self.source();
        config.deploy.backup_dir = self.backups();
        config.deploy.log_file = self.path().join("deploy.log");
        config.health_check.timeout = Duration::from_secs(2);
        config
    }
}
