//! Colored terminal output.
//!
//! User-facing status lines go through here rather than `tracing`, so they
//! show up regardless of the log level.

use std::io::{self, Write};
use std::path::Path;

use owo_colors::OwoColorize;

/// Print a line that was also sent to the game.
pub fn print_game_message(line: &str) {
    println!("{line}");
    let _ = io::stdout().flush();
}

/// Print a command that was sent to the game.
pub fn print_command(command: &str) {
    println!("{} {}", "[COMMAND]".blue().bold(), command.dimmed());
    let _ = io::stdout().flush();
}

/// Print the banner shown once the monitor is running.
pub fn print_banner(watched: &[&Path], target: &Path) {
    println!("{}", format_banner(watched, target));
    let _ = io::stdout().flush();
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{}", message.green());
    let _ = io::stdout().flush();
}

/// Print a fatal error as a single red line on stderr.
pub fn print_fatal(message: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), single_line(message).red());
    let _ = io::stderr().flush();
}

/// Build the monitoring banner text.
#[must_use]
pub fn format_banner(watched: &[&Path], target: &Path) -> String {
    let mut banner = String::from("Automatically monitoring the following for changes:\n");
    for dir in watched {
        banner.push_str(&format!("  {}\n", dir.display().green()));
    }
    banner.push_str(&format!(
        "Copying files to:\n  {}\n\nPress Ctrl+C to stop.",
        target.display().green()
    ));
    banner
}

/// Collapse a message onto one line.
#[must_use]
pub fn single_line(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
