//! `fatal` ends the process, so each case re-runs this test binary as a child
//! and inspects its exit status and stderr.

use kvlog::{AtomicLevel, Field, Level, Logger};
use std::env;
use std::process::{Command, Output};

const CHILD_ENV: &str = "KVLOG_FATAL_CHILD";

fn run_child(test_name: &str) -> Output {
    let exe = env::current_exe().expect("Failed to locate test binary");
    Command::new(exe)
        .args([test_name, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, test_name)
        .output()
        .expect("Failed to run child process")
}

fn is_child(test_name: &str) -> bool {
    env::var(CHILD_ENV).is_ok_and(|name| name == test_name)
}

#[test]
fn test_fatal_writes_then_exits() {
    if is_child("test_fatal_writes_then_exits") {
        let level = AtomicLevel::new_at(Level::Info);
        let logger = Logger::production(&level);
        logger.fatal("my Fatal message", &[Field::string("k", "v")]);
        unreachable!("fatal returned");
    }

    let output = run_child("test_fatal_writes_then_exits");
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[level:fatal]"), "stderr: {}", stderr);
    assert!(stderr.contains("[msg:my Fatal message][k:v][stacktrace:"));
    assert!(!stderr.contains("fatal returned"));
}

#[test]
fn test_fatal_exits_even_when_nothing_is_written() {
    if is_child("test_fatal_exits_even_when_nothing_is_written") {
        Logger::nop().fatal("discarded", &[]);
        unreachable!("fatal returned");
    }

    let output = run_child("test_fatal_exits_even_when_nothing_is_written");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("[msg:discarded]"));
}
