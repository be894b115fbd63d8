use dupfinder::duplicates::{DuplicateFinder, FinderError};
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_scan_two_non_overlapping_directories() {
    let dir1 = tempdir().unwrap();
    let dir2 = tempdir().unwrap();

    File::create(dir1.path().join("a.txt"))
        .unwrap()
        .write_all(b"dup")
        .unwrap();
    File::create(dir2.path().join("b.txt"))
        .unwrap()
        .write_all(b"dup")
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates_in_paths(&[dir1.path().to_path_buf(), dir2.path().to_path_buf()])
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 2);
    assert_eq!(summary.total_files, 2);
}

#[test]
fn test_representative_comes_from_first_root() {
    let dir1 = tempdir().unwrap();
    let dir2 = tempdir().unwrap();
    fs::write(dir1.path().join("z.txt"), b"triple").unwrap();
    fs::write(dir2.path().join("a.txt"), b"triple").unwrap();
    fs::write(dir2.path().join("b.txt"), b"triple").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder
        .find_duplicates_in_paths(&[dir2.path().to_path_buf(), dir1.path().to_path_buf()])
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);
    assert!(groups[0].representative().path.ends_with("a.txt"));
    assert!(groups[0].files[2].path.ends_with("z.txt"));
}

#[test]
fn test_overlapping_roots_count_each_file_once() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("one.txt"), b"only copy").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates_in_paths(&[dir.path().to_path_buf(), sub.clone()])
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_invalid_root_fails_before_scanning() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let finder = DuplicateFinder::with_defaults();
    let result = finder.find_duplicates_in_paths(&[dir.path().to_path_buf(), missing.clone()]);

    match result {
        Err(FinderError::PathNotFound(path)) => assert_eq!(path, missing),
        other => panic!("Expected PathNotFound, got {:?}", other.map(|(g, _)| g)),
    }
}
