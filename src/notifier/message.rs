//! Notification entries understood by the companion mod.

use serde::{Deserialize, Serialize};

/// What the companion mod should do with an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// Show the text on screen.
    Msg,
    /// Run the text as a console command.
    Command,
    /// Liveness heartbeat.
    Ping,
}

/// One entry in the `save<slot>.dat` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub data: String,
    /// Wall-clock time the entry was produced, if it was timestamped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl NotificationMessage {
    /// A `msg` entry.
    #[must_use]
    pub fn msg(data: impl Into<String>) -> Self {
        Self {
            kind: MessageType::Msg,
            data: data.into(),
            timestamp: None,
        }
    }

    /// A `msg` entry prefixed with a display time.
    #[must_use]
    pub fn timestamped_msg(line: &str, timestamp: &str) -> Self {
        Self {
            kind: MessageType::Msg,
            data: format!("{timestamp} - {line}"),
            timestamp: Some(timestamp.to_string()),
        }
    }

    /// A `command` entry.
    #[must_use]
    pub fn command(data: impl Into<String>) -> Self {
        Self {
            kind: MessageType::Command,
            data: data.into(),
            timestamp: None,
        }
    }

    /// A `ping` entry.
    #[must_use]
    pub fn ping() -> Self {
        Self {
            kind: MessageType::Ping,
            data: String::new(),
            timestamp: None,
        }
    }
}

/// Console noise printed when a batch job is interrupted on Windows.
pub const INTERRUPT_ARTIFACT: &str = "Terminate batch job (Y/N)?";

/// Split message text into display lines.
///
/// CRLF is normalized to LF before splitting and trailing line breaks do not
/// produce empty entries.
#[must_use]
pub fn split_lines(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");
    normalized
        .trim_end_matches('\n')
        .split('\n')
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_msg() {
        let json = serde_json::to_string(&NotificationMessage::msg("hello")).unwrap();
        assert_eq!(json, r#"{"type":"msg","data":"hello"}"#);
    }

    #[test]
    fn test_serialize_ping_has_empty_data() {
        let json = serde_json::to_string(&NotificationMessage::ping()).unwrap();
        assert_eq!(json, r#"{"type":"ping","data":""}"#);
    }

    #[test]
    fn test_serialize_timestamped_msg() {
        let message = NotificationMessage::timestamped_msg("Compiling...", "1:23:45 AM");
        assert_eq!(message.data, "1:23:45 AM - Compiling...");
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains(r#""timestamp":"1:23:45 AM""#));
    }

    #[test]
    fn test_deserialize_command() {
        let message: NotificationMessage =
            serde_json::from_str(r#"{"type":"command","data":"restart"}"#).unwrap();
        assert_eq!(message, NotificationMessage::command("restart"));
    }

    #[test]
    fn test_split_lines_normalizes_crlf() {
        assert_eq!(split_lines("line1\r\nline2"), vec!["line1", "line2"]);
    }

    #[test]
    fn test_split_lines_single_line() {
        assert_eq!(split_lines("just one"), vec!["just one"]);
    }

    #[test]
    fn test_split_lines_drops_trailing_break_only() {
        assert_eq!(split_lines("a\n\nb\n"), vec!["a", "", "b"]);
    }
}
