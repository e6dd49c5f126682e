use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::time::Duration;

fn cargo_bin() -> Command {
    Command::cargo_bin("bfi").unwrap()
}

// The reference interpreter's embedded demo program.
const HELLO: &str = "\
>++++++++[<+++++++++>-]<.>++++[<+++++++>-]<+.+++++++..+++.>>++++++[<+++++++>-]<+
+.------------.>++++++[<+++++++++>-]<+.<.+++.------.--------.>>>++++[<++++++++>-
]<+.";

#[test]
fn run_hello_world_prints_golden_string() {
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .arg("run")
        .arg(HELLO)
        .assert()
        .success()
        .stdout("Hello, World!\n");
}

#[test]
fn run_from_file_matches_inline_run() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(HELLO.as_bytes()).unwrap();

    cargo_bin()
        .timeout(Duration::from_secs(5))
        .arg("run")
        .arg("--file")
        .arg(file.path())
        .assert()
        .success()
        .stdout("Hello, World!\n");
}

#[test]
fn run_countdown_loop_emits_raw_bytes() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("run")
        .arg("+++[-.]")
        .assert()
        .success()
        .stdout("\u{2}\u{1}\u{0}\n");
}

#[test]
fn run_comment_only_program_prints_empty_line() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .args(["run", "no instructions here"])
        .assert()
        .success()
        .stdout("\n");
}

#[test]
fn run_is_deterministic_across_invocations() {
    let first = cargo_bin()
        .timeout(Duration::from_secs(5))
        .args(["run", HELLO])
        .output()
        .unwrap();
    let second = cargo_bin()
        .timeout(Duration::from_secs(5))
        .args(["run", HELLO])
        .output()
        .unwrap();
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn run_with_custom_tape_size_wraps_the_head() {
    // On a 1-cell tape every move lands back on the same cell.
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .args(["run", "--tape-size", "1", "+>+<."])
        .assert()
        .success()
        .stdout("\u{2}\n");
}

#[test]
fn run_without_code_or_file_shows_usage() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("run")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}
