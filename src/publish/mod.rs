// ABOUTME: Copies a source tree's top-level entries into the content root.
// ABOUTME: Honors the exclude set and fully replaces entries on name collision.

mod exclude;

pub use exclude::{ExcludeSet, SkipReason, is_hidden};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::tree;

/// Errors that abort publishing.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The source directory could not be listed.
    #[error("failed to read source directory {path}: {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Copying an entry failed; `copied` entries were published before it.
    #[error("failed to publish {entry} after {copied} entries: {source}")]
    PublishFailed {
        copied: usize,
        entry: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PublishError {
    /// Entries fully copied before the failure.
    pub fn copied(&self) -> usize {
        match self {
            PublishError::ReadSource { .. } => 0,
            PublishError::PublishFailed { copied, .. } => *copied,
        }
    }
}

/// Copy every publishable top-level entry of `source_dir` into `content_root`.
///
/// Entries are processed in name order. An existing entry with the same name
/// is removed first, so directories are replaced rather than merged. The first
/// I/O error stops the run and reports how many entries were already copied.
pub fn publish(
    source_dir: &Path,
    content_root: &Path,
    exclude: &ExcludeSet,
) -> Result<usize, PublishError> {
    let read_err = |source: io::Error| PublishError::ReadSource {
        path: source_dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(source_dir)
        .map_err(read_err)?
        .collect::<io::Result<Vec<_>>>()
        .map_err(read_err)?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut copied = 0;
    for entry in entries {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let src = entry.path();

        if let Some(reason) = exclude.skip_reason(&name, &src) {
            match reason {
                SkipReason::Guarded => {
                    tracing::warn!(entry = %name, "skipping entry that contains rollout state")
                }
                _ => tracing::debug!(entry = %name, ?reason, "skipping entry"),
            }
            continue;
        }

        let dst = content_root.join(entry.file_name());
        let result = fs::create_dir_all(content_root)
            .and_then(|()| tree::remove_entry(&dst))
            .and_then(|()| tree::copy_entry(&src, &dst));

        if let Err(source) = result {
            tracing::error!(entry = %name, copied, error = %source, "publish aborted");
            return Err(PublishError::PublishFailed {
                copied,
                entry: src,
                source,
            });
        }

        tracing::debug!(entry = %name, "published");
        copied += 1;
    }

    tracing::info!(
        count = copied,
        root = %content_root.display(),
        "deployed {} items",
        copied
    );
    Ok(copied)
}
