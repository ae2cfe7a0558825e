// ABOUTME: Recursive filesystem helpers shared by snapshots and publishing.
// ABOUTME: Copies, removes and inspects directory trees using walkdir.

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Recursively copy the directory `src` to `dst`, returning the number of files.
///
/// Symlinks are followed, so the copy holds regular files only.
pub fn copy_dir(src: &Path, dst: &Path) -> io::Result<u64> {
    let mut files = 0;

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry.path().strip_prefix(src).map_err(io::Error::other)?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            files += 1;
        }
    }

    Ok(files)
}

/// Copy a file or directory to `dst`, whichever `src` is.
pub fn copy_entry(src: &Path, dst: &Path) -> io::Result<u64> {
    if fs::metadata(src)?.is_dir() {
        copy_dir(src, dst)
    } else {
        fs::copy(src, dst)?;
        Ok(1)
    }
}

/// Remove a file, symlink or directory tree. Missing paths are not an error.
pub fn remove_entry(path: &Path) -> io::Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// True when `path` is missing, or is a directory with no entries.
pub fn is_absent_or_empty(path: &Path) -> io::Result<bool> {
    match fs::read_dir(path) {
        Ok(mut entries) => Ok(entries.next().is_none()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
        Err(e) => Err(e),
    }
}
