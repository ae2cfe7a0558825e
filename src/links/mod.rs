// ABOUTME: Broken-link scanner for a static site tree, with optional case-mismatch repair.
// ABOUTME: Walks markup, script and style files and checks every local reference on disk.

mod extract;
mod resolve;

pub use extract::{Reference, references};
pub use resolve::{case_insensitive_match, is_broken, replace_last, target_path};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions whose contents are scanned.
pub const EXTENSIONS: [&str; 4] = ["html", "htm", "js", "css"];

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("link check root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What can be done about a broken reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remedy {
    /// The target directory has the file under a different case.
    CaseMismatch {
        from: String,
        to: String,
        /// Set once the file on disk has been rewritten.
        fixed: Option<String>,
    },
    /// The directory exists but has no matching entry.
    NotFound,
    /// The target's directory does not exist.
    MissingDirectory(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    pub file: PathBuf,
    pub reference: String,
    pub remedy: Remedy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    pub files_checked: usize,
    pub broken: Vec<BrokenLink>,
    /// Files rewritten in fix mode.
    pub rewritten: Vec<PathBuf>,
}

impl LinkReport {
    pub fn fixes_applied(&self) -> usize {
        self.broken
            .iter()
            .filter(|b| matches!(b.remedy, Remedy::CaseMismatch { fixed: Some(_), .. }))
            .count()
    }
}

/// Scans a tree for broken local references.
#[derive(Debug, Clone)]
pub struct LinkChecker {
    root: PathBuf,
    fix: bool,
    skip_dirs: Vec<String>,
}

impl LinkChecker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fix: false,
            skip_dirs: vec![".git".to_string()],
        }
    }

    /// Rewrite case mismatches in place instead of only reporting them.
    pub fn fix(mut self, fix: bool) -> Self {
        self.fix = fix;
        self
    }

    /// Do not descend into directories with this name.
    pub fn skip_dir(mut self, name: impl Into<String>) -> Self {
        self.skip_dirs.push(name.into());
        self
    }

    /// # Errors
    ///
    /// Returns `LinkError::RootNotFound` if the root is not a directory,
    /// `LinkError::Walk` if the tree cannot be traversed, and
    /// `LinkError::Write` if a fixed file cannot be saved.
    pub fn run(&self) -> Result<LinkReport, LinkError> {
        if !self.root.is_dir() {
            return Err(LinkError::RootNotFound(self.root.clone()));
        }

        let mut report = LinkReport::default();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || !self.skip_dirs.iter().any(|d| e.file_name() == d.as_str())
            });

        for entry in walker {
            let entry = entry.map_err(|source| LinkError::Walk {
                path: self.root.clone(),
                source,
            })?;
            if !entry.file_type().is_file() || !has_checked_extension(entry.path()) {
                continue;
            }

            report.files_checked += 1;
            if self.check_file(entry.path(), &mut report.broken)? {
                report.rewritten.push(entry.path().to_path_buf());
            }
        }

        tracing::info!(
            files = report.files_checked,
            broken = report.broken.len(),
            fixed = report.fixes_applied(),
            "link scan complete"
        );
        Ok(report)
    }

    /// Check one file, appending findings. Returns true when the file was rewritten.
    fn check_file(&self, path: &Path, broken: &mut Vec<BrokenLink>) -> Result<bool, LinkError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "could not read file");
                return Ok(false);
            }
        };
        let Ok(text) = String::from_utf8(bytes) else {
            tracing::warn!(file = %path.display(), "skipping file that is not valid UTF-8");
            return Ok(false);
        };

        let mut edits = Vec::new();
        for reference in references(&text) {
            let Some(target) = target_path(&self.root, path, &reference.value) else {
                continue;
            };
            if !is_broken(&target) {
                continue;
            }

            tracing::debug!(file = %path.display(), reference = %reference.value, "broken link");
            let remedy = self.remedy(&target, &reference, &mut edits);
            broken.push(BrokenLink {
                file: path.to_path_buf(),
                reference: reference.value,
                remedy,
            });
        }

        if edits.is_empty() {
            return Ok(false);
        }

        let mut text = text;
        // Spans are in document order; apply back to front so earlier ones stay valid.
        for (span, value) in edits.into_iter().rev() {
            text.replace_range(span, &value);
        }
        fs::write(path, text).map_err(|source| LinkError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(file = %path.display(), "saved link fixes");
        Ok(true)
    }

    fn remedy(
        &self,
        target: &Path,
        reference: &Reference,
        edits: &mut Vec<(std::ops::Range<usize>, String)>,
    ) -> Remedy {
        let dir = target.parent().unwrap_or(&self.root);
        if !dir.is_dir() {
            return Remedy::MissingDirectory(dir.to_path_buf());
        }

        let Some(name) = target.file_name().and_then(|n| n.to_str()) else {
            return Remedy::NotFound;
        };
        let Some(real) = case_insensitive_match(dir, name) else {
            return Remedy::NotFound;
        };

        let fixed = if self.fix {
            replace_last(&reference.value, name, &real)
        } else {
            None
        };
        if let Some(value) = &fixed {
            edits.push((reference.span.clone(), value.clone()));
        }

        Remedy::CaseMismatch {
            from: name.to_string(),
            to: real,
            fixed,
        }
    }
}

/// Scan `root`, skipping `.git` and any of `skip_dirs`.
pub fn scan(root: &Path, fix: bool, skip_dirs: &[&str]) -> Result<LinkReport, LinkError> {
    skip_dirs
        .iter()
        .fold(LinkChecker::new(root).fix(fix), |checker, dir| {
            checker.skip_dir(*dir)
        })
        .run()
}

fn has_checked_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| EXTENSIONS.contains(&e))
}
