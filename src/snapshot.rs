// ABOUTME: Timestamped backups of the content root, used for rollback.
// ABOUTME: Captures copy into a hidden staging name first, so only complete snapshots are listed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::tree;
use crate::types::SnapshotId;

/// Errors raised while capturing, listing or restoring snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Copying the content root into the backups directory failed.
    #[error("failed to capture {root} into {target}: {source}")]
    Capture {
        root: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Restoring a snapshot failed; the content root may be incomplete.
    #[error("failed to restore {snapshot} into {root}: {source}")]
    Restore {
        snapshot: PathBuf,
        root: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No snapshot with the requested name exists.
    #[error("snapshot not found: {0}")]
    NotFound(String),

    #[error("I/O error reading snapshots: {0}")]
    Io(#[from] io::Error),
}

/// A complete copy of the content root at capture time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    id: SnapshotId,
    path: PathBuf,
}

impl Snapshot {
    pub fn id(&self) -> SnapshotId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> String {
        self.id.to_string()
    }
}

/// Owns the backups directory. Snapshots are only ever added, never pruned.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    backup_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Copy `content_root` into a new snapshot.
    ///
    /// Returns `Ok(None)` when the content root is missing or empty: there is
    /// nothing to roll back to, which is not an error.
    pub fn capture(&self, content_root: &Path) -> Result<Option<Snapshot>, SnapshotError> {
        let capture_err = |target: &Path, source: io::Error| SnapshotError::Capture {
            root: content_root.to_path_buf(),
            target: target.to_path_buf(),
            source,
        };

        if tree::is_absent_or_empty(content_root).map_err(|e| capture_err(content_root, e))? {
            tracing::info!(root = %content_root.display(), "content root is empty, no snapshot needed");
            return Ok(None);
        }

        fs::create_dir_all(&self.backup_dir).map_err(|e| capture_err(&self.backup_dir, e))?;

        let id = self.unused_id(SnapshotId::now());
        let path = self.backup_dir.join(id.to_string());
        let staging = self.backup_dir.join(format!(".{id}.partial"));

        tree::remove_entry(&staging).map_err(|e| capture_err(&staging, e))?;
        if let Err(e) = tree::copy_dir(content_root, &staging) {
            let _ = tree::remove_entry(&staging);
            return Err(capture_err(&staging, e));
        }
        fs::rename(&staging, &path).map_err(|e| capture_err(&path, e))?;

        tracing::info!(snapshot = %path.display(), "snapshot created");
        Ok(Some(Snapshot { id, path }))
    }

    /// Replace `content_root` with a full copy of `snapshot`.
    ///
    /// The snapshot is first copied next to the content root; the old tree is
    /// only removed once that copy is complete. Any error is a
    /// [`SnapshotError::Restore`], which callers must treat as unrecoverable.
    pub fn restore(&self, snapshot: &Snapshot, content_root: &Path) -> Result<(), SnapshotError> {
        let restore_err = |source: io::Error| SnapshotError::Restore {
            snapshot: snapshot.path.clone(),
            root: content_root.to_path_buf(),
            source,
        };

        let staging = staging_path(content_root);
        if let Some(parent) = staging.parent() {
            fs::create_dir_all(parent).map_err(restore_err)?;
        }

        tree::remove_entry(&staging).map_err(restore_err)?;
        if let Err(e) = tree::copy_dir(&snapshot.path, &staging) {
            let _ = tree::remove_entry(&staging);
            return Err(restore_err(e));
        }

        tree::remove_entry(content_root).map_err(restore_err)?;
        fs::rename(&staging, content_root).map_err(restore_err)?;

        tracing::info!(
            snapshot = %snapshot.path.display(),
            root = %content_root.display(),
            "snapshot restored"
        );
        Ok(())
    }

    /// Restore when a snapshot exists; a no-op returning `false` otherwise.
    pub fn restore_optional(
        &self,
        snapshot: Option<&Snapshot>,
        content_root: &Path,
    ) -> Result<bool, SnapshotError> {
        match snapshot {
            Some(snapshot) => self.restore(snapshot, content_root).map(|()| true),
            None => Ok(false),
        }
    }

    /// All complete snapshots, oldest first. A missing backups directory is empty.
    pub fn list(&self) -> Result<Vec<Snapshot>, SnapshotError> {
        let entries = match fs::read_dir(&self.backup_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut snapshots = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Ok(id) = SnapshotId::parse(name) {
                snapshots.push(Snapshot {
                    id,
                    path: entry.path(),
                });
            }
        }

        snapshots.sort_by_key(|s| s.id);
        Ok(snapshots)
    }

    pub fn latest(&self) -> Result<Option<Snapshot>, SnapshotError> {
        Ok(self.list()?.pop())
    }

    pub fn find(&self, name: &str) -> Result<Snapshot, SnapshotError> {
        self.list()?
            .into_iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| SnapshotError::NotFound(name.to_string()))
    }

    /// First identifier at `id`'s timestamp whose directory does not exist yet.
    fn unused_id(&self, id: SnapshotId) -> SnapshotId {
        let mut candidate = id;
        let mut seq = 0;
        while self.backup_dir.join(candidate.to_string()).exists() {
            seq += 1;
            candidate = id.with_seq(seq);
        }
        candidate
    }
}

/// Hidden sibling of the content root used while a restore is in flight.
fn staging_path(content_root: &Path) -> PathBuf {
    let name = content_root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "content".to_string());
    let parent = match content_root.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    parent.join(format!(".{name}.restore"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_path_is_hidden_sibling() {
        assert_eq!(staging_path(Path::new("www")), PathBuf::from("./.www.restore"));
        assert_eq!(
            staging_path(Path::new("/srv/site/www")),
            PathBuf::from("/srv/site/.www.restore")
        );
    }

    #[test]
    fn unused_id_skips_existing_directories() {
        let temp = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(temp.path());
        let id = SnapshotId::now();

        assert_eq!(store.unused_id(id), id);

        fs::create_dir_all(temp.path().join(id.to_string())).unwrap();
        fs::create_dir_all(temp.path().join(id.with_seq(1).to_string())).unwrap();
        assert_eq!(store.unused_id(id), id.with_seq(2));
    }

    #[test]
    fn list_ignores_partial_and_foreign_entries() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("backup_20240101_000000")).unwrap();
        fs::create_dir_all(temp.path().join(".backup_20240102_000000.partial")).unwrap();
        fs::create_dir_all(temp.path().join("notes")).unwrap();
        fs::write(temp.path().join("backup_20240103_000000"), "file").unwrap();

        let store = SnapshotStore::new(temp.path());
        let names: Vec<String> = store.list().unwrap().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["backup_20240101_000000".to_string()]);
    }

    #[test]
    fn list_on_missing_backup_dir_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(temp.path().join("missing"));
        assert!(store.list().unwrap().is_empty());
        assert!(store.latest().unwrap().is_none());
    }
}
