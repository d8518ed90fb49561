//! Compiler supervision: spawn, read output, classify.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::events::{classify_stderr, classify_stdout, BuildEvent};
use super::process::{CompilerProcess, CompilerProcessBuilder, SpawnError};

/// Capacity of the build event channel.
const EVENT_BUFFER: usize = 256;

/// How long the compiler gets to exit after SIGTERM.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(3);

/// Errors from running the compiler.
#[derive(thiserror::Error, Debug)]
pub enum CompilerError {
    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error("Compiler process stdout not available")]
    NoStdout,

    #[error("Compiler process stderr not available")]
    NoStderr,

    #[error("Failed to wait for the compiler: {0}")]
    Wait(#[from] std::io::Error),

    /// A one-shot compilation did not exit cleanly.
    #[error("Failed to compile the mod: \"{command}\" exited with {status}")]
    Failed { command: String, status: ExitStatus },
}

/// Handle to a supervised compiler.
#[derive(Debug)]
pub struct CompilerHandle {
    /// Classified output, stdout and stderr interleaved as read.
    pub events: mpsc::Receiver<BuildEvent>,
    /// Resolves with the exit status once the process has exited and all of
    /// its output has been delivered to `events`.
    pub exit: JoinHandle<std::io::Result<ExitStatus>>,
    shutdown: Option<oneshot::Sender<()>>,
    pid: Option<u32>,
}

impl CompilerHandle {
    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Terminate the compiler and wait for it to exit.
    ///
    /// Undelivered output is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the process could not be terminated or waited on.
    pub async fn shutdown(mut self) -> Result<ExitStatus, CompilerError> {
        // Readers blocked on a full channel must see it closed, or `exit`
        // never resolves.
        self.events.close();
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match self.exit.await {
            Ok(result) => Ok(result?),
            Err(join_err) => Err(CompilerError::Wait(std::io::Error::other(join_err))),
        }
    }
}

/// Starts the compiler and turns its output into build events.
#[derive(Debug, Clone, Default)]
pub struct CompilerSupervisor {
    builder: CompilerProcessBuilder,
}

impl CompilerSupervisor {
    #[must_use]
    pub fn new(builder: CompilerProcessBuilder) -> Self {
        Self { builder }
    }

    /// Spawn the compiler and start reading its output.
    ///
    /// Every stdout line becomes one event (unrecognized lines as
    /// `RawOutput`). Stderr lines become `CompilationFailed`, except blank
    /// lines and the interrupt marker.
    ///
    /// # Errors
    ///
    /// Returns an error if the compiler cannot be spawned.
    pub fn start(&self) -> Result<CompilerHandle, CompilerError> {
        let mut process = CompilerProcess::spawn(&self.builder)?;
        let stdout = process.take_stdout().ok_or(CompilerError::NoStdout)?;
        let stderr = process.take_stderr().ok_or(CompilerError::NoStderr)?;
        let pid = process.id();

        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let stdout_task = tokio::spawn(forward_lines(stdout, event_tx.clone(), |line| {
            Some(classify_stdout(line))
        }));
        let stderr_task = tokio::spawn(forward_lines(stderr, event_tx, classify_stderr));

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let exit = tokio::spawn(async move {
            let status = tokio::select! {
                status = process.wait() => status?,
                _ = shutdown_rx => {
                    tracing::debug!(pid, "Stopping compiler");
                    process.graceful_terminate(SHUTDOWN_TIMEOUT).await?;
                    process.wait().await?
                }
            };
            let _ = stdout_task.await;
            let _ = stderr_task.await;
            tracing::info!(pid, %status, "Compiler exited");
            Ok::<_, std::io::Error>(status)
        });

        Ok(CompilerHandle {
            events: event_rx,
            exit,
            shutdown: Some(shutdown_tx),
            pid,
        })
    }
}

/// Run the compiler once with inherited stdio and require a clean exit.
///
/// # Errors
///
/// Returns `CompilerError::Failed` on a non-zero exit, or a spawn error.
pub async fn run_once(builder: &CompilerProcessBuilder) -> Result<(), CompilerError> {
    let command_line = builder.command_line();
    tracing::info!(command = %command_line, "Compiling");

    let status = builder
        .command()
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| SpawnError::from_io(builder.program(), e))?;

    if !status.success() {
        return Err(CompilerError::Failed {
            command: command_line,
            status,
        });
    }
    Ok(())
}

/// Read lines until EOF, sending each classified line.
///
/// Invalid UTF-8 is replaced rather than ending the stream, so the pipe keeps
/// draining.
async fn forward_lines<R, F>(reader: R, tx: mpsc::Sender<BuildEvent>, classify: F)
where
    R: AsyncRead + Unpin,
    F: Fn(&str) -> Option<BuildEvent>,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&buf);
                let line = text.trim_end_matches(['\n', '\r']);
                tracing::trace!(line, "Compiler output");
                let Some(event) = classify(line) else {
                    continue;
                };
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read compiler output");
                break;
            }
        }
    }
}
