use dupfinder::duplicates::{ComparisonStrategy, DuplicateFinder, FinderConfig};
use dupfinder::progress::ProgressCallback;
use std::fs::{self, File};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

fn write(path: &std::path::Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

#[derive(Default)]
struct Recorder {
    total: Mutex<usize>,
    last: Mutex<Option<(usize, usize)>>,
    messages: Mutex<Vec<String>>,
}

impl ProgressCallback for Recorder {
    fn on_phase_start(&self, _phase: &str, total: usize) {
        *self.total.lock().unwrap() = total;
    }

    fn on_progress(&self, current: usize, _path: &str) {
        let total = *self.total.lock().unwrap();
        *self.last.lock().unwrap() = Some((current, total));
    }

    fn on_phase_end(&self, _phase: &str) {}

    fn on_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"content a");
    write(&dir.path().join("b.txt"), b"content b");
    write(&dir.path().join("c.txt"), b"content c");

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
}

#[test]
fn test_scan_hello_world() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"hello");
    write(&dir.path().join("b.txt"), b"hello");
    write(&dir.path().join("c.txt"), b"world");

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    let names: Vec<_> = groups[0]
        .files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
    assert_eq!(summary.duplicate_files, 1);
    assert_eq!(summary.reclaimable_space, 5);
}

#[test]
fn test_scan_three_identical_files_in_encounter_order() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    write(&dir.path().join("x.bin"), b"same bytes");
    write(&dir.path().join("sub").join("y.bin"), b"same bytes");
    write(&dir.path().join("a.bin"), b"same bytes");

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);
    // Entries are visited sorted by name, depth first
    assert!(groups[0].files[0].path.ends_with("a.bin"));
    assert!(groups[0].files[1].path.ends_with("sub/y.bin"));
    assert!(groups[0].files[2].path.ends_with("x.bin"));
    assert_eq!(summary.duplicate_files, 2);
}

#[test]
fn test_scan_empty_files_form_a_group() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("empty1")).unwrap();
    File::create(dir.path().join("empty2")).unwrap();
    write(&dir.path().join("full"), b"x");

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].size(), 0);
    assert_eq!(summary.reclaimable_space, 0);
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    for i in 0..6 {
        write(&dir.path().join(format!("f{}", i)), format!("{}", i % 2).as_bytes());
    }

    let finder = DuplicateFinder::with_defaults();
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn test_bucketed_strategy_matches_pairwise() {
    let dir = tempdir().unwrap();
    let contents: [&[u8]; 8] = [b"aa", b"ab", b"aa", b"", b"ab", b"", b"zz", b"aa"];
    for (i, content) in contents.iter().enumerate() {
        write(&dir.path().join(format!("f{}", i)), content);
    }

    let pairwise = DuplicateFinder::with_defaults();
    let bucketed = DuplicateFinder::new(
        FinderConfig::default().with_strategy(ComparisonStrategy::Bucketed),
    );

    let (expected, _) = pairwise.find_duplicates(dir.path()).unwrap();
    let (actual, _) = bucketed.find_duplicates(dir.path()).unwrap();

    assert_eq!(expected.len(), 3);
    assert_eq!(actual, expected);
}

#[test]
fn test_progress_reaches_total_and_announces_count() {
    let dir = tempdir().unwrap();
    for i in 0..4 {
        write(&dir.path().join(format!("f{}", i)), b"data");
    }
    let recorder = Arc::new(Recorder::default());

    let finder =
        DuplicateFinder::new(FinderConfig::default().with_progress_callback(recorder.clone()));
    finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(*recorder.last.lock().unwrap(), Some((4, 4)));
    assert!(recorder
        .messages
        .lock()
        .unwrap()
        .contains(&"found: 4 file(s)".to_string()));
}
