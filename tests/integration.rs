//! Integration tests for isaacscript.

mod compiler;
mod monitor;

use std::process::Command;

fn isaacscript() -> Command {
    Command::new(env!("CARGO_BIN_EXE_isaacscript"))
}

#[test]
fn test_monitor_command_help() {
    let output = isaacscript()
        .args(["monitor", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("--mods-directory"), "Help should mention --mods-directory");
    assert!(stdout.contains("--save-slot"), "Help should mention --save-slot");
    assert!(
        stdout.contains("--skip-project-checks"),
        "Help should mention --skip-project-checks"
    );
}

#[test]
fn test_save_slot_out_of_range_rejected() {
    let output = isaacscript()
        .args(["monitor", "--save-slot", "4"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--save-slot"), "got: {stderr}");
}

#[test]
fn test_copy_without_config_fails() {
    let temp_dir = tempfile::TempDir::new().unwrap();

    let output = isaacscript()
        .arg("copy")
        .current_dir(temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[ERROR]"), "got: {stderr}");
}
