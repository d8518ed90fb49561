//! Append-only writer for the companion mod's message file.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::Value;

use crate::display;
use crate::file;

use super::error::NotifyError;
use super::message::{split_lines, NotificationMessage, INTERRUPT_ARTIFACT};

/// Writes notifications into a `save<slot>.dat` file.
///
/// Every call reads the current array, appends to it and rewrites the whole
/// file. There is no locking: the CLI is the only writer and the game re-reads
/// the file before rendering.
#[derive(Debug, Clone)]
pub struct GameNotifier {
    path: PathBuf,
    echo: bool,
}

impl GameNotifier {
    /// Create a notifier writing to the given data file.
    ///
    /// Messages are echoed to stdout.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            echo: true,
        }
    }

    /// Enable or disable echoing messages to stdout.
    #[must_use]
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// The data file being written.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one `msg` entry per line of `text`.
    ///
    /// When `add_timestamp` is set, every line is prefixed with the current
    /// local time (computed once per call). Text equal to the console
    /// interrupt prompt is dropped. Returns the number of entries appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file cannot be written.
    pub fn message(&self, text: &str, add_timestamp: bool) -> Result<usize, NotifyError> {
        if text == INTERRUPT_ARTIFACT {
            tracing::trace!("Dropping console interrupt prompt");
            return Ok(0);
        }

        let timestamp = add_timestamp.then(display_time);
        let entries: Vec<NotificationMessage> = split_lines(text)
            .iter()
            .map(|line| match timestamp {
                Some(ref ts) => NotificationMessage::timestamped_msg(line, ts),
                None => NotificationMessage::msg(line.as_str()),
            })
            .collect();

        if self.echo {
            for entry in &entries {
                display::print_game_message(&entry.data);
            }
        }

        self.append(&entries)?;
        Ok(entries.len())
    }

    /// Append one `command` entry, verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file cannot be written.
    pub fn command(&self, text: &str) -> Result<(), NotifyError> {
        tracing::info!(command = %text, "Sending command to the game");
        self.append(&[NotificationMessage::command(text)])
    }

    /// Append one `ping` entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file cannot be written.
    pub fn ping(&self) -> Result<(), NotifyError> {
        self.append(&[NotificationMessage::ping()])
    }

    /// Read the entries currently in the data file.
    ///
    /// Entries the companion mod does not understand are skipped. A missing
    /// or malformed file reads as empty.
    #[must_use]
    pub fn read_entries(&self) -> Vec<NotificationMessage> {
        self.read_raw()
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect()
    }

    /// Read the raw JSON array, treating anything unreadable as empty.
    fn read_raw(&self) -> Vec<Value> {
        let Ok(content) = std::fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) | Err(_) => {
                if !content.trim().is_empty() {
                    tracing::debug!(
                        path = %self.path.display(),
                        "Message file is not a JSON array, starting a new list"
                    );
                }
                Vec::new()
            }
        }
    }

    fn append(&self, entries: &[NotificationMessage]) -> Result<(), NotifyError> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut list = self.read_raw();
        for entry in entries {
            list.push(serde_json::to_value(entry)?);
        }

        if let Some(parent) = self.path.parent() {
            if !file::path_exists(parent)? {
                file::make_dir(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&Value::Array(list))?;
        file::write_file(&self.path, &content)?;
        Ok(())
    }
}

/// Current local time in the style the game overlay shows, e.g. `1:23:45 AM`.
#[must_use]
pub fn display_time() -> String {
    Local::now().format("%-I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::MessageType;
    use tempfile::TempDir;

    fn notifier(temp_dir: &TempDir) -> GameNotifier {
        GameNotifier::new(temp_dir.path().join("save1.dat")).with_echo(false)
    }

    #[test]
    fn test_message_splits_crlf_lines() {
        let temp_dir = TempDir::new().unwrap();
        let notifier = notifier(&temp_dir);

        let appended = notifier.message("line1\r\nline2", true).unwrap();
        assert_eq!(appended, 2);

        let entries = notifier.read_entries();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.kind == MessageType::Msg));
        assert!(entries[0].data.ends_with(" - line1"));
        assert!(entries[1].data.ends_with(" - line2"));
        assert!(!entries[0].data.contains('\r'));

        let ts = entries[0].timestamp.clone().unwrap();
        assert_eq!(entries[1].timestamp.as_deref(), Some(ts.as_str()));
        assert!(entries[0].data.starts_with(&ts));
        assert!(entries[1].data.starts_with(&ts));
    }

    #[test]
    fn test_message_without_timestamp() {
        let temp_dir = TempDir::new().unwrap();
        let notifier = notifier(&temp_dir);

        notifier.message("raw output", false).unwrap();

        assert_eq!(
            notifier.read_entries(),
            vec![NotificationMessage::msg("raw output")]
        );
    }

    #[test]
    fn test_interrupt_artifact_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let notifier = notifier(&temp_dir);

        let appended = notifier.message("Terminate batch job (Y/N)?", true).unwrap();

        assert_eq!(appended, 0);
        assert!(!notifier.path().exists());
    }

    #[test]
    fn test_command_is_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let notifier = notifier(&temp_dir);

        notifier.command("luamod my mod\nwith newline").unwrap();

        assert_eq!(
            notifier.read_entries(),
            vec![NotificationMessage::command("luamod my mod\nwith newline")]
        );
    }

    #[test]
    fn test_append_only_growth_in_call_order() {
        let temp_dir = TempDir::new().unwrap();
        let notifier = notifier(&temp_dir);

        notifier.message("first", false).unwrap();
        assert!(serde_json::from_str::<Value>(&std::fs::read_to_string(notifier.path()).unwrap()).is_ok());
        notifier.command("luamod my-mod").unwrap();
        notifier.ping().unwrap();
        notifier.message("last", false).unwrap();

        let raw: Value =
            serde_json::from_str(&std::fs::read_to_string(notifier.path()).unwrap()).unwrap();
        assert_eq!(raw.as_array().unwrap().len(), 4);
        assert_eq!(
            notifier.read_entries(),
            vec![
                NotificationMessage::msg("first"),
                NotificationMessage::command("luamod my-mod"),
                NotificationMessage::ping(),
                NotificationMessage::msg("last"),
            ]
        );
    }

    #[test]
    fn test_malformed_file_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let notifier = notifier(&temp_dir);
        std::fs::write(notifier.path(), "{\"not\": \"an array\"}").unwrap();

        notifier.ping().unwrap();

        assert_eq!(notifier.read_entries(), vec![NotificationMessage::ping()]);
    }

    #[test]
    fn test_empty_file_is_treated_as_empty_list() {
        let temp_dir = TempDir::new().unwrap();
        let notifier = notifier(&temp_dir);
        std::fs::write(notifier.path(), "").unwrap();

        notifier.command("restart").unwrap();

        assert_eq!(notifier.read_entries().len(), 1);
    }

    #[test]
    fn test_unknown_entries_preserved() {
        let temp_dir = TempDir::new().unwrap();
        let notifier = notifier(&temp_dir);
        std::fs::write(notifier.path(), r#"[{"type":"other","data":1}]"#).unwrap();

        notifier.ping().unwrap();

        let raw: Value =
            serde_json::from_str(&std::fs::read_to_string(notifier.path()).unwrap()).unwrap();
        assert_eq!(raw.as_array().unwrap().len(), 2);
        assert_eq!(raw[0]["type"], "other");
    }

    #[test]
    fn test_creates_missing_data_directory() {
        let temp_dir = TempDir::new().unwrap();
        let notifier = GameNotifier::new(temp_dir.path().join("data").join("save3.dat"))
            .with_echo(false);

        notifier.ping().unwrap();

        assert!(notifier.path().exists());
    }

    #[test]
    fn test_display_time_format() {
        let time = display_time();
        assert!(time.ends_with(" AM") || time.ends_with(" PM"));
        assert_eq!(time.matches(':').count(), 2);
    }
}
