use dupfinder::actions::delete::{delete_redundant, DeleteConfig, PrintingReporter};
use dupfinder::duplicates::DuplicateFinder;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_scan_then_delete_keeps_one_copy_per_group() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a1"), b"alpha").unwrap();
    fs::write(dir.path().join("a2"), b"alpha").unwrap();
    fs::write(dir.path().join("b1"), b"beta").unwrap();
    fs::write(dir.path().join("b2"), b"beta").unwrap();
    fs::write(dir.path().join("b3"), b"beta").unwrap();
    fs::write(dir.path().join("u"), b"unique").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
    assert_eq!(groups.len(), 2);

    let reporter = PrintingReporter::new(Vec::new());
    let result = delete_redundant(&groups, &DeleteConfig::permanent(), Some(&reporter));

    assert_eq!(result.success_count(), 3);
    let mut left: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    left.sort();
    assert_eq!(left, vec!["a1", "b1", "u"]);

    let report = String::from_utf8(reporter.into_inner()).unwrap();
    assert_eq!(report.lines().filter(|l| l.starts_with("Removed: /")).count(), 3);
    assert!(report.ends_with("Removed: 3 file(s)\n"));

    // A second scan finds nothing left to remove
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
    assert!(groups.is_empty());
}

#[test]
fn test_delete_leaves_group_when_representative_vanished() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("first"), b"x").unwrap();
    fs::write(dir.path().join("second"), b"x").unwrap();
    fs::write(dir.path().join("third"), b"y").unwrap();
    fs::write(dir.path().join("fourth"), b"y").unwrap();

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    fs::remove_file(dir.path().join("first")).unwrap();

    let result = delete_redundant::<PrintingReporter<Vec<u8>>>(
        &groups,
        &DeleteConfig::permanent(),
        None,
    );

    assert!(dir.path().join("second").exists());
    assert_eq!(result.failure_count(), 1);
    // The other group is still processed
    assert_eq!(result.success_count(), 1);
}

#[test]
fn test_delete_keeps_copy_when_representative_rewritten_after_scan() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"precious").unwrap();
    fs::write(dir.path().join("b"), b"precious").unwrap();

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(groups.len(), 1);
    fs::write(dir.path().join("a"), b"overwritten after scan").unwrap();

    let reporter = PrintingReporter::new(Vec::new());
    let result = delete_redundant(&groups, &DeleteConfig::permanent(), Some(&reporter));

    assert_eq!(result.success_count(), 0);
    assert_eq!(fs::read(dir.path().join("b")).unwrap(), b"precious");
    let report = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(report.contains("Not removed: "));
    assert!(report.ends_with("Removed: 0 file(s)\n"));
}
