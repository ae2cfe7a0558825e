// ABOUTME: Maps a link reference onto the filesystem and decides whether it is broken.
// ABOUTME: Also finds case-insensitive matches for missing file names.

use std::fs;
use std::path::{Path, PathBuf};

const IGNORED_PREFIXES: [&str; 7] = [
    "http:",
    "https:",
    "mailto:",
    "tel:",
    "#",
    "javascript:",
    "data:",
];

/// Filesystem path a reference in `file` points at, or `None` for external
/// links, anchors and references that are empty once the query is removed.
pub fn target_path(root: &Path, file: &Path, reference: &str) -> Option<PathBuf> {
    if IGNORED_PREFIXES.iter().any(|p| reference.starts_with(p)) {
        return None;
    }

    let decoded = urlencoding::decode(reference)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| reference.to_string());
    let stripped = decoded.split(['?', '#']).next().unwrap_or_default();
    if stripped.is_empty() {
        return None;
    }

    let path = match stripped.strip_prefix('/') {
        Some(rooted) => root.join(rooted.trim_start_matches('/')),
        None => file.parent().unwrap_or(root).join(stripped),
    };
    Some(path)
}

/// A target is fine when it is a file, or a directory with an `index.html`.
pub fn is_broken(target: &Path) -> bool {
    if target.is_file() {
        return false;
    }
    !(target.is_dir() && target.join("index.html").is_file())
}

/// Real name of the entry in `dir` matching `name` case-insensitively.
pub fn case_insensitive_match(dir: &Path, name: &str) -> Option<String> {
    let wanted = name.to_lowercase();
    let entries = fs::read_dir(dir).ok()?;
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    names.sort();
    names.into_iter().find(|n| n.to_lowercase() == wanted)
}

/// `value` with its last occurrence of `from` replaced by `to`.
pub fn replace_last(value: &str, from: &str, to: &str) -> Option<String> {
    let at = value.rfind(from)?;
    Some(format!("{}{}{}", &value[..at], to, &value[at + from.len()..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_links_are_ignored() {
        let root = Path::new("/site");
        let file = Path::new("/site/index.html");
        for reference in [
            "https://example.com/",
            "http://example.com/x",
            "mailto:a@b.c",
            "tel:123",
            "#top",
            "javascript:void(0)",
            "data:image/png;base64,AAAA",
        ] {
            assert_eq!(target_path(root, file, reference), None, "{reference}");
        }
    }

    #[test]
    fn resolves_relative_and_rooted_references() {
        let root = Path::new("/site");
        let file = Path::new("/site/blog/post.html");

        assert_eq!(
            target_path(root, file, "img/a.png"),
            Some(PathBuf::from("/site/blog/img/a.png"))
        );
        assert_eq!(
            target_path(root, file, "/img/a.png"),
            Some(PathBuf::from("/site/img/a.png"))
        );
        assert_eq!(
            target_path(root, file, "My%20File.pdf?v=2#page=3"),
            Some(PathBuf::from("/site/blog/My File.pdf"))
        );
        assert_eq!(target_path(root, file, "?page=2"), None);
    }

    #[test]
    fn directory_needs_index() {
        let temp = tempfile::tempdir().unwrap();
        let docs = temp.path().join("docs");
        fs::create_dir(&docs).unwrap();
        assert!(is_broken(&docs));

        fs::write(docs.join("index.html"), "<p>docs</p>").unwrap();
        assert!(!is_broken(&docs));
        assert!(!is_broken(&docs.join("index.html")));
        assert!(is_broken(&docs.join("missing.html")));
    }

    #[test]
    fn finds_case_insensitive_name() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("Logo.PNG"), b"png").unwrap();

        assert_eq!(
            case_insensitive_match(temp.path(), "logo.png"),
            Some("Logo.PNG".to_string())
        );
        assert_eq!(case_insensitive_match(temp.path(), "other.png"), None);
        assert_eq!(case_insensitive_match(&temp.path().join("nope"), "x"), None);
    }

    #[test]
    fn replace_last_only_touches_final_occurrence() {
        assert_eq!(
            replace_last("logo/logo.png", "logo.png", "Logo.png"),
            Some("logo/Logo.png".to_string())
        );
        assert_eq!(replace_last("a/b.png", "c.png", "C.png"), None);
    }
}
