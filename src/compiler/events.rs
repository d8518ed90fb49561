//! Build events and output classification.

/// A classified line of compiler output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// The compiler entered watch mode and started the first compilation.
    WatchStarted,
    /// A source change triggered an incremental compilation.
    CompilationStarted,
    /// A compilation finished without errors.
    CompilationSucceeded,
    /// The compiler reported an error on stderr.
    CompilationFailed(String),
    /// Any other stdout line, passed through unchanged.
    RawOutput(String),
}

/// Known compiler phrases, checked in order. The first phrase contained in a
/// line decides its event.
pub const STDOUT_PHRASES: &[(&str, BuildEvent)] = &[
    ("Starting compilation in watch mode...", BuildEvent::WatchStarted),
    (
        "File change detected. Starting incremental compilation...",
        BuildEvent::CompilationStarted,
    ),
    (
        "Found 0 errors. Watching for file changes.",
        BuildEvent::CompilationSucceeded,
    ),
];

/// Stderr noise left behind when the compiler is interrupted.
pub const STDERR_INTERRUPT: &str = "^C";

/// Classify one stdout line. Lines that match no known phrase are returned
/// as `RawOutput`, never dropped.
#[must_use]
pub fn classify_stdout(line: &str) -> BuildEvent {
    STDOUT_PHRASES
        .iter()
        .find(|(phrase, _)| line.contains(phrase))
        .map_or_else(|| BuildEvent::RawOutput(line.to_string()), |(_, event)| event.clone())
}

/// Classify one stderr line. Empty lines and the interrupt marker yield
/// nothing; everything else is a compilation failure.
#[must_use]
pub fn classify_stderr(line: &str) -> Option<BuildEvent> {
    if line.trim().is_empty() || line == STDERR_INTERRUPT {
        return None;
    }
    Some(BuildEvent::CompilationFailed(line.to_string()))
}
