use dupfinder::prompt::{confirm, PathCollector, PromptOutcome};
use dupfinder::scanner::path_utils::absolute_normalized;
use std::fs;
use tempfile::tempdir;

fn run(script: &str) -> (PromptOutcome, String) {
    let mut collector = PathCollector::new(script.as_bytes(), Vec::new());
    let outcome = collector.collect().unwrap();
    (outcome, String::from_utf8(collector.into_writer()).unwrap())
}

#[test]
fn test_prompt_collects_multiple_roots_in_order() {
    let dir1 = tempdir().unwrap();
    let dir2 = tempdir().unwrap();
    let script = format!(
        "{}\n{}\n/continue\n",
        dir1.path().display(),
        dir2.path().display()
    );

    let (outcome, output) = run(&script);

    assert_eq!(
        outcome,
        PromptOutcome::Paths(vec![
            absolute_normalized(dir1.path()).unwrap(),
            absolute_normalized(dir2.path()).unwrap(),
        ])
    );
    assert_eq!(output.matches("Added successfully.").count(), 2);
}

#[test]
fn test_prompt_parent_keeps_single_entry() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("photos/2023")).unwrap();
    fs::create_dir_all(dir.path().join("photos/2024")).unwrap();
    let photos = absolute_normalized(&dir.path().join("photos")).unwrap();
    let script = format!(
        "{p}/2023\n{p}/2024\n{p}\n/list\n/continue\n",
        p = photos.display()
    );

    let (outcome, output) = run(&script);

    assert_eq!(outcome, PromptOutcome::Paths(vec![photos.clone()]));
    assert_eq!(output.matches("is replaced with parent directory").count(), 2);
}

#[test]
fn test_prompt_exit_returns_without_paths() {
    let dir = tempdir().unwrap();
    let script = format!("{}\n/exit\n", dir.path().display());

    let (outcome, _) = run(&script);

    assert_eq!(outcome, PromptOutcome::Exit);
}

#[test]
fn test_prompt_help_lists_every_command() {
    let (_, output) = run("/help\n/exit\n");
    for command in ["/list", "/continue", "/help", "/remove PATH", "/clear", "/exit"] {
        assert!(output.contains(command), "help is missing {}", command);
    }
}

#[test]
fn test_confirm_repeats_until_answered() {
    let mut out = Vec::new();
    let answer = confirm(&b"\nx\nn\n"[..], &mut out, "Create log?").unwrap();

    assert!(!answer);
    assert_eq!(
        String::from_utf8(out).unwrap().matches("Create log? (y/n): ").count(),
        3
    );
}
