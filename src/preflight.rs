// ABOUTME: Pre-flight checks run before a rollout touches anything.
// ABOUTME: Verifies the source tree and prepares the content root and backups directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};

/// Fail fast on a layout the rollout cannot work with.
///
/// # Errors
///
/// Returns `Error::Preflight` if:
/// - `source_dir` does not exist or is not a directory
/// - The content root is the source directory itself
/// - The content root or the backups directory cannot be created
/// - The backups directory lies inside the content root
pub fn check(config: &Config) -> Result<()> {
    check_paths(
        &config.deploy.source_dir,
        &config.server.root_dir,
        &config.deploy.backup_dir,
    )
}

pub(crate) fn check_paths(source_dir: &Path, root: &Path, backup_dir: &Path) -> Result<()> {
    if !source_dir.is_dir() {
        return Err(Error::Preflight(format!(
            "source directory {} does not exist",
            source_dir.display()
        )));
    }

    if same_path(source_dir, root) {
        return Err(Error::Preflight(format!(
            "content root {} must not be the source directory",
            root.display()
        )));
    }

    if !root.exists() {
        fs::create_dir_all(root).map_err(|e| {
            Error::Preflight(format!("cannot create content root {}: {e}", root.display()))
        })?;
        tracing::info!(root = %root.display(), "created root directory");
    }

    fs::create_dir_all(backup_dir).map_err(|e| {
        Error::Preflight(format!(
            "cannot create backups directory {}: {e}",
            backup_dir.display()
        ))
    })?;

    if canonical(backup_dir).starts_with(canonical(root)) {
        return Err(Error::Preflight(format!(
            "backups directory {} must not be inside the content root {}",
            backup_dir.display(),
            root.display()
        )));
    }

    Ok(())
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn same_path(a: &Path, b: &Path) -> bool {
    canonical(a) == canonical(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_root_and_backup_dir() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("www");
        let backups = temp.path().join("deploy_backups");

        check_paths(temp.path(), &root, &backups).unwrap();

        assert!(root.is_dir());
        assert!(backups.is_dir());
    }

    #[test]
    fn rejects_missing_source() {
        let temp = tempfile::tempdir().unwrap();
        let err = check_paths(
            &temp.path().join("nope"),
            &temp.path().join("www"),
            &temp.path().join("b"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Preflight(msg) if msg.contains("does not exist")));
    }

    #[test]
    fn rejects_root_equal_to_source() {
        let temp = tempfile::tempdir().unwrap();
        let err = check_paths(temp.path(), temp.path(), &temp.path().join("b")).unwrap_err();
        assert!(matches!(err, Error::Preflight(msg) if msg.contains("must not be the source")));
    }

    #[test]
    fn rejects_backups_inside_root() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("www");
        let err = check_paths(temp.path(), &root, &root.join("backups")).unwrap_err();
        assert!(matches!(err, Error::Preflight(msg) if msg.contains("inside the content root")));
    }
}
