// ABOUTME: Names and paths the publisher never copies into the content root.
// ABOUTME: Hidden entries are always skipped; guarded paths protect against self-copies.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Why a source entry was not published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Name starts with the hidden-file marker.
    Hidden,
    /// Name is in the exclude list.
    Excluded,
    /// Entry is, or contains, the content root or backups directory.
    Guarded,
}

/// Fixed set of entry names (plus guarded paths) excluded from publishing.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    names: BTreeSet<String>,
    guarded: Vec<PathBuf>,
}

impl ExcludeSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            guarded: Vec::new(),
        }
    }

    /// The exclude set for a rollout: configured names, with the content root
    /// and backups directory guarded by path.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.exclude_names())
            .guard(&config.server.root_dir)
            .guard(&config.deploy.backup_dir)
    }

    /// Never publish `path`, or any source entry that contains it.
    pub fn guard(mut self, path: &Path) -> Self {
        self.guarded.push(normalize(path));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Decide whether the source entry `name` at `path` must be skipped.
    pub fn skip_reason(&self, name: &str, path: &Path) -> Option<SkipReason> {
        if is_hidden(name) {
            return Some(SkipReason::Hidden);
        }
        if self.contains(name) {
            return Some(SkipReason::Excluded);
        }
        if !self.guarded.is_empty() {
            let entry = normalize(path);
            if self.guarded.iter().any(|g| g.starts_with(&entry)) {
                return Some(SkipReason::Guarded);
            }
        }
        None
    }
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Canonical form when the path exists, absolute form otherwise.
fn normalize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_wins_over_everything() {
        let set = ExcludeSet::new([".git"]);
        assert_eq!(
            set.skip_reason(".git", Path::new(".git")),
            Some(SkipReason::Hidden)
        );
        assert_eq!(
            set.skip_reason(".env", Path::new(".env")),
            Some(SkipReason::Hidden)
        );
    }

    #[test]
    fn excluded_names_are_exact_matches() {
        let set = ExcludeSet::new(["www", "deploy.log"]);
        assert_eq!(
            set.skip_reason("www", Path::new("www")),
            Some(SkipReason::Excluded)
        );
        assert_eq!(set.skip_reason("www2", Path::new("www2")), None);
        assert_eq!(set.skip_reason("deploy.log.1", Path::new("deploy.log.1")), None);
    }

    #[test]
    fn guarded_path_and_its_ancestors_are_skipped() {
        let temp = tempfile::tempdir().unwrap();
        let public = temp.path().join("public");
        let root = public.join("www");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::create_dir_all(temp.path().join("assets")).unwrap();

        let set = ExcludeSet::default().guard(&root);
        assert_eq!(
            set.skip_reason("public", &public),
            Some(SkipReason::Guarded)
        );
        assert_eq!(
            set.skip_reason("assets", &temp.path().join("assets")),
            None
        );
    }

    #[test]
    fn from_config_covers_rollout_state() {
        let config = Config::template();
        let set = ExcludeSet::from_config(&config);
        for name in ["www", "deploy_backups", "deploy.log", "deploy_config.json", ".git"] {
            assert!(
                set.contains(name) || is_hidden(name),
                "{name} should be excluded"
            );
        }
    }
}
