//! Compiler process spawning and control.
//!
//! A builder configures the program, its arguments and whether it runs in
//! watch mode; `CompilerProcess` wraps the running child.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::{Child, ChildStderr, ChildStdout, Command};

/// Program used to run the compiler when none is configured.
pub const DEFAULT_COMPILER_PROGRAM: &str = "npx";

/// Arguments passed to the default program.
pub const DEFAULT_COMPILER_ARGS: &[&str] = &["tstl"];

/// Flags that keep the compiler running and stop it from clearing the screen.
pub const WATCH_FLAGS: &[&str] = &["--watch", "--preserveWatchOutput"];

/// Error type for process spawning operations.
#[derive(thiserror::Error, Debug)]
pub enum SpawnError {
    /// The program was not found.
    #[error("Failed to find the \"{0}\" program. Is it installed and on the PATH?")]
    NotFound(String),
    /// Permission denied when spawning.
    #[error("Permission denied when running \"{0}\"")]
    PermissionDenied(String),
    /// Other I/O error.
    #[error("Failed to run \"{program}\": {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl SpawnError {
    /// Create a `SpawnError` from an I/O error, classifying common cases.
    pub(crate) fn from_io(program: &str, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(program.to_string()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(program.to_string()),
            _ => Self::Io {
                program: program.to_string(),
                source: err,
            },
        }
    }
}

/// Builder for the compiler command line.
#[derive(Debug, Clone)]
pub struct CompilerProcessBuilder {
    program: String,
    args: Vec<String>,
    watch: bool,
    working_dir: Option<PathBuf>,
}

impl Default for CompilerProcessBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_COMPILER_PROGRAM).args(DEFAULT_COMPILER_ARGS)
    }
}

impl CompilerProcessBuilder {
    /// Create a builder for the given program, with no arguments and watch
    /// mode off.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            watch: false,
            working_dir: None,
        }
    }

    /// Append arguments that come before the watch flags.
    #[must_use]
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| (*s).to_string()));
        self
    }

    /// Run in watch mode.
    #[must_use]
    pub fn watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    /// Set the working directory for the compiler.
    #[must_use]
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn is_watch(&self) -> bool {
        self.watch
    }

    #[must_use]
    pub fn get_working_dir(&self) -> Option<&PathBuf> {
        self.working_dir.as_ref()
    }

    /// Build the command-line arguments.
    #[must_use]
    pub fn build_args(&self) -> Vec<String> {
        let mut args = self.args.clone();
        if self.watch {
            args.extend(WATCH_FLAGS.iter().map(|s| (*s).to_string()));
        }
        args
    }

    /// The full command line, for display.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.build_args())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// A `Command` with program, arguments and working directory applied.
    pub(crate) fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.build_args());
        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

/// A running compiler process with piped output.
#[derive(Debug)]
pub struct CompilerProcess {
    child: Child,
}

impl CompilerProcess {
    /// Spawn the compiler with stdout and stderr piped.
    ///
    /// The child is killed if this value is dropped.
    ///
    /// # Errors
    ///
    /// Returns `SpawnError` if the process fails to spawn.
    pub fn spawn(builder: &CompilerProcessBuilder) -> Result<Self, SpawnError> {
        let child = builder
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpawnError::from_io(builder.program(), e))?;

        tracing::info!(
            command = %builder.command_line(),
            pid = child.id(),
            "Spawned compiler"
        );
        Ok(Self { child })
    }

    /// Take ownership of the stdout handle.
    ///
    /// This can only be called once; subsequent calls return `None`.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.stdout.take()
    }

    /// Take ownership of the stderr handle.
    ///
    /// This can only be called once; subsequent calls return `None`.
    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.child.stderr.take()
    }

    /// Get the process ID, if still running.
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Wait for the process to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if waiting fails.
    pub async fn wait(&mut self) -> std::io::Result<ExitStatus> {
        self.child.wait().await
    }

    /// Forcefully kill the process.
    ///
    /// # Errors
    ///
    /// Returns an error if the kill signal cannot be sent.
    pub async fn kill(&mut self) -> std::io::Result<()> {
        self.child.kill().await
    }

    /// Attempt graceful termination with a timeout.
    ///
    /// On Unix, sends SIGTERM first, then SIGKILL after the timeout.
    /// On other platforms, falls back to immediate kill.
    ///
    /// # Errors
    ///
    /// Returns an error if termination fails.
    pub async fn graceful_terminate(&mut self, timeout: Duration) -> std::io::Result<()> {
        #[cfg(unix)]
        {
            self.graceful_terminate_unix(timeout).await
        }

        #[cfg(not(unix))]
        {
            let _ = timeout;
            self.kill().await
        }
    }

    #[cfg(unix)]
    async fn graceful_terminate_unix(&mut self, timeout: Duration) -> std::io::Result<()> {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        let Some(pid) = self.id() else {
            return Ok(());
        };

        let nix_pid = Pid::from_raw(i32::try_from(pid).unwrap_or(i32::MAX));
        let _ = kill(nix_pid, Signal::SIGTERM);

        match tokio::time::timeout(timeout, self.child.wait()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(e),
            Err(_) => {
                tracing::warn!(pid, "Compiler ignored SIGTERM, killing it");
                self.child.kill().await
            }
        }
    }
}
