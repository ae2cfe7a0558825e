// ABOUTME: Integration tests for the snapshot store.
// ABOUTME: Capture/restore fidelity, empty roots, naming and manual lookup.

mod support;

use std::fs;
use webroll::snapshot::{SnapshotError, SnapshotStore};

#[test]
fn capture_then_restore_reproduces_tree() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("www");
    support::write_tree(
        &root,
        &[
            ("index.html", "<h1>v1</h1>"),
            ("css/site.css", "body { color: red }"),
            ("img/deep/nested/logo.svg", "<svg/>"),
        ],
    );
    fs::write(root.join("bin.dat"), [0u8, 159, 146, 150, 255]).unwrap();
    let before = support::read_tree(&root);

    let store = SnapshotStore::new(temp.path().join("backups"));
    let snapshot = store.capture(&root).unwrap().expect("non-empty root");
    assert!(snapshot.name().starts_with("backup_"));
    assert_eq!(support::read_tree(snapshot.path()), before);

    // Replace the content entirely, including a new file that must vanish.
    fs::remove_dir_all(&root).unwrap();
    support::write_tree(&root, &[("index.html", "<h1>v2</h1>"), ("new.html", "new")]);

    store.restore(&snapshot, &root).unwrap();
    assert_eq!(support::read_tree(&root), before);
}

#[test]
fn capture_of_absent_or_empty_root_is_none() {
    let temp = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(temp.path().join("backups"));

    assert!(store.capture(&temp.path().join("missing")).unwrap().is_none());

    let empty = temp.path().join("empty");
    fs::create_dir(&empty).unwrap();
    assert!(store.capture(&empty).unwrap().is_none());

    assert!(store.list().unwrap().is_empty());
}

#[test]
fn restore_optional_without_snapshot_is_noop() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("www");
    support::write_tree(&root, &[("index.html", "current")]);
    let store = SnapshotStore::new(temp.path().join("backups"));

    assert!(!store.restore_optional(None, &root).unwrap());
    assert_eq!(fs::read_to_string(root.join("index.html")).unwrap(), "current");
}

#[test]
fn restore_optional_with_snapshot_restores() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("www");
    support::write_tree(&root, &[("index.html", "old")]);
    let store = SnapshotStore::new(temp.path().join("backups"));
    let snapshot = store.capture(&root).unwrap();

    fs::write(root.join("index.html"), "new").unwrap();

    assert!(store.restore_optional(snapshot.as_ref(), &root).unwrap());
    assert_eq!(fs::read_to_string(root.join("index.html")).unwrap(), "old");
}

#[test]
fn captures_in_the_same_second_get_distinct_names() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("www");
    support::write_tree(&root, &[("index.html", "x")]);
    let store = SnapshotStore::new(temp.path().join("backups"));

    let first = store.capture(&root).unwrap().unwrap();
    let second = store.capture(&root).unwrap().unwrap();

    assert_ne!(first.name(), second.name());
    assert_eq!(store.list().unwrap().len(), 2);
    assert_eq!(store.latest().unwrap().unwrap(), second);
}

#[test]
fn restore_leaves_no_staging_directory() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("www");
    support::write_tree(&root, &[("index.html", "x")]);
    let store = SnapshotStore::new(temp.path().join("backups"));
    let snapshot = store.capture(&root).unwrap().unwrap();

    store.restore(&snapshot, &root).unwrap();

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".restore"))
        .collect();
    assert!(leftovers.is_empty(), "{leftovers:?}");
}

#[test]
fn restore_from_missing_snapshot_dir_fails() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("www");
    support::write_tree(&root, &[("index.html", "x")]);
    let store = SnapshotStore::new(temp.path().join("backups"));
    let snapshot = store.capture(&root).unwrap().unwrap();

    fs::remove_dir_all(snapshot.path()).unwrap();

    let err = store.restore(&snapshot, &root).unwrap_err();
    assert!(matches!(err, SnapshotError::Restore { .. }));
    // The content root is only replaced once the copy has succeeded.
    assert_eq!(fs::read_to_string(root.join("index.html")).unwrap(), "x");
}

#[test]
fn find_by_name() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("www");
    support::write_tree(&root, &[("index.html", "x")]);
    let store = SnapshotStore::new(temp.path().join("backups"));
    let snapshot = store.capture(&root).unwrap().unwrap();

    assert_eq!(store.find(&snapshot.name()).unwrap(), snapshot);
    assert!(matches!(
        store.find("backup_19990101_000000"),
        Err(SnapshotError::NotFound(_))
    ));
}
