//! The `monitor` event loop.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::{Duration, Instant};

use tokio::task::JoinError;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::compiler::{
    BuildEvent, CompilerError, CompilerHandle, CompilerProcessBuilder, CompilerSupervisor,
};
use crate::config::{ConfigLoader, ConfigOverrides};
use crate::display;
use crate::notifier::GameNotifier;
use crate::project::{check_package_json, default_watcher_mod_source_dir, ProjectLayout};
use crate::syncer::{DirectorySyncer, Mirror, SyncError, SyncEvent, SyncerHandle};

use super::companion::prepare_companion_mod;
use super::error::MonitorError;
use super::state::{MonitorState, MonitorStateMachine};

/// How often a heartbeat is sent to the game.
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(1);

/// Settings for a `monitor` run.
#[derive(Debug, Clone)]
pub struct MonitorOptions {
    pub project_root: PathBuf,
    pub overrides: ConfigOverrides,
    pub skip_project_checks: bool,
    /// Bundled companion mod. Defaults to the copy next to the executable.
    pub watcher_mod_source_dir: Option<PathBuf>,
    /// Compiler command, without watch flags.
    pub compiler: CompilerProcessBuilder,
    /// `None` disables the heartbeat.
    pub ping_interval: Option<Duration>,
    /// Echo game messages to stdout.
    pub echo: bool,
}

impl MonitorOptions {
    #[must_use]
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            overrides: ConfigOverrides::default(),
            skip_project_checks: false,
            watcher_mod_source_dir: None,
            compiler: CompilerProcessBuilder::default(),
            ping_interval: Some(DEFAULT_PING_INTERVAL),
            echo: true,
        }
    }
}

/// Why the event loop ended.
enum LoopExit {
    Cancelled,
    /// The compiler has already exited.
    Compiler(MonitorError),
    /// The syncer task has already finished.
    Syncer(MonitorError),
    /// Both children are still running.
    Handler(MonitorError),
}

/// Relays syncer and compiler events to the game.
#[derive(Debug)]
pub struct Monitor {
    layout: ProjectLayout,
    notifier: GameNotifier,
    state: MonitorStateMachine,
    compiler: CompilerProcessBuilder,
    ping_interval: Option<Duration>,
    echo: bool,
    compile_started: Option<Instant>,
}

impl Monitor {
    /// Create a monitor for an already prepared layout.
    ///
    /// The heartbeat is off and the default compiler is used.
    #[must_use]
    pub fn new(layout: ProjectLayout, notifier: GameNotifier) -> Self {
        Self {
            layout,
            notifier,
            state: MonitorStateMachine::new(),
            compiler: CompilerProcessBuilder::default(),
            ping_interval: None,
            echo: false,
            compile_started: None,
        }
    }

    #[must_use]
    pub fn with_compiler(mut self, compiler: CompilerProcessBuilder) -> Self {
        self.compiler = compiler;
        self
    }

    #[must_use]
    pub fn with_ping_interval(mut self, interval: Option<Duration>) -> Self {
        self.ping_interval = interval;
        self
    }

    /// Load the configuration, run the project checks and install the
    /// companion mod.
    ///
    /// # Errors
    ///
    /// Returns the first configuration, project or filesystem error.
    pub fn prepare(options: &MonitorOptions) -> Result<Self, MonitorError> {
        let mut state = MonitorStateMachine::new();

        let config =
            ConfigLoader::new(&options.project_root).load_with_overrides(&options.overrides)?;
        if config.is_common_dev() {
            tracing::info!("Using the development version of isaacscript-common");
        }
        if options.skip_project_checks {
            tracing::debug!("Skipping project checks");
        } else {
            check_package_json(&options.project_root)?;
        }

        let watcher_mod_source_dir = options
            .watcher_mod_source_dir
            .clone()
            .unwrap_or_else(default_watcher_mod_source_dir);
        let layout = ProjectLayout::new(&options.project_root, &config, watcher_mod_source_dir)?;

        state.transition(MonitorState::PreparingCompanionMod);
        prepare_companion_mod(&layout)?;

        let notifier = GameNotifier::new(layout.notification_path()).with_echo(options.echo);
        Ok(Self {
            layout,
            notifier,
            state,
            compiler: options.compiler.clone(),
            ping_interval: options.ping_interval,
            echo: options.echo,
            compile_started: None,
        })
    }

    #[must_use]
    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    #[must_use]
    pub fn notifier(&self) -> &GameNotifier {
        &self.notifier
    }

    #[must_use]
    pub fn state(&self) -> MonitorState {
        self.state.state()
    }

    /// Report a completed sync action to the game.
    ///
    /// # Errors
    ///
    /// Returns an error if the message file cannot be written.
    pub fn handle_sync_event(&mut self, event: &SyncEvent) -> Result<(), MonitorError> {
        self.state.record_sync();
        if event.quiet {
            tracing::debug!(path = %event.path.display(), "Synced main script");
            return Ok(());
        }
        self.notifier.message(&event.describe(), true)?;
        Ok(())
    }

    /// Report a build event to the game.
    ///
    /// A successful compilation reloads the mod and restarts the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the message file cannot be written.
    pub fn handle_build_event(&mut self, event: &BuildEvent) -> Result<(), MonitorError> {
        match event {
            BuildEvent::WatchStarted => {
                self.compile_started = Some(Instant::now());
                self.notifier
                    .message("IsaacScript is now watching for changes.", true)?;
                self.notifier
                    .message("Compiling the mod for the first time...", true)?;
            }
            BuildEvent::CompilationStarted => {
                self.compile_started = Some(Instant::now());
                self.notifier
                    .message("TypeScript change detected. Compiling...", true)?;
            }
            BuildEvent::CompilationSucceeded => {
                self.state.record_compilation();
                let name = &self.layout.mod_name;
                self.send_command(&format!("luamod {name}"))?;
                self.send_command("restart")?;

                let mut text = format!("{name} - Successfully compiled & reloaded!");
                if let Some(started) = self.compile_started.take() {
                    text.push_str(&format!(
                        " (in {:.1} seconds)",
                        started.elapsed().as_secs_f64()
                    ));
                }
                self.notifier.message(&text, true)?;
            }
            BuildEvent::CompilationFailed(message) => {
                self.state.record_failure();
                self.notifier.message(&format!("Error: {message}"), true)?;
            }
            BuildEvent::RawOutput(line) => {
                if !line.trim().is_empty() {
                    self.notifier.message(line, false)?;
                }
            }
        }
        Ok(())
    }

    fn send_command(&self, command: &str) -> Result<(), MonitorError> {
        if self.echo {
            display::print_command(command);
        }
        self.notifier.command(command)?;
        Ok(())
    }

    /// Start the syncer and the compiler and relay their events until one of
    /// them stops or `cancel` fires.
    ///
    /// Returns `Ok(())` only when cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if either child fails to start, exits, or a handler
    /// fails.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<(), MonitorError> {
        self.state.transition(MonitorState::Spawning);

        let syncer_cancel = cancel.child_token();
        let mirror = Mirror::new(&self.layout.mod_source_dir, &self.layout.mod_target_dir);
        let mut syncer = DirectorySyncer::new(mirror).spawn(syncer_cancel.clone());
        if !syncer.ready().await {
            self.state.transition(MonitorState::Failed);
            return Err(syncer_exit_error(syncer.task.await));
        }

        let builder = self
            .compiler
            .clone()
            .watch(true)
            .working_dir(&self.layout.project_root);
        let mut compiler = match CompilerSupervisor::new(builder).start() {
            Ok(handle) => handle,
            Err(e) => {
                self.state.transition(MonitorState::Failed);
                syncer_cancel.cancel();
                return Err(e.into());
            }
        };

        self.state.transition(MonitorState::Running);
        if self.echo {
            let src_dir = self.layout.project_root.join("src");
            display::print_banner(
                &[&src_dir, &self.layout.mod_source_dir],
                &self.layout.mod_target_dir,
            );
        }

        let exit = self.event_loop(&mut syncer, &mut compiler, &cancel).await;
        syncer_cancel.cancel();

        let result = match exit {
            LoopExit::Cancelled => {
                compiler.shutdown().await?;
                let _ = tokio::time::timeout(Duration::from_secs(1), syncer.task).await;
                self.state.transition(MonitorState::Stopped);
                Ok(())
            }
            LoopExit::Compiler(e) => {
                self.state.transition(MonitorState::Failed);
                Err(e)
            }
            LoopExit::Syncer(e) | LoopExit::Handler(e) => {
                self.state.transition(MonitorState::Failed);
                if let Err(shutdown_err) = compiler.shutdown().await {
                    tracing::warn!(error = %shutdown_err, "Failed to stop the compiler");
                }
                Err(e)
            }
        };

        tracing::info!(stats = ?self.state.stats(), "Monitor stopped");
        result
    }

    async fn event_loop(
        &mut self,
        syncer: &mut SyncerHandle,
        compiler: &mut CompilerHandle,
        cancel: &CancellationToken,
    ) -> LoopExit {
        let mut heartbeat = self.ping_interval.map(|period| {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });

        loop {
            tokio::select! {
                biased;

                () = cancel.cancelled() => {
                    tracing::info!("Monitor cancelled");
                    return LoopExit::Cancelled;
                }
                Some(event) = compiler.events.recv() => {
                    tracing::debug!(?event, "Build event");
                    if let Err(e) = self.handle_build_event(&event) {
                        return LoopExit::Handler(e);
                    }
                }
                Some(event) = syncer.events.recv() => {
                    tracing::debug!(?event, "Sync event");
                    if let Err(e) = self.handle_sync_event(&event) {
                        return LoopExit::Handler(e);
                    }
                }
                result = &mut compiler.exit => {
                    tracing::error!("Compiler exited");
                    return LoopExit::Compiler(compiler_exit_error(result));
                }
                result = &mut syncer.task => {
                    tracing::error!("Directory syncer stopped");
                    return LoopExit::Syncer(syncer_exit_error(result));
                }
                () = tick(heartbeat.as_mut()) => {
                    if let Err(e) = self.notifier.ping() {
                        return LoopExit::Handler(e.into());
                    }
                }
            }
        }
    }
}

async fn tick(interval: Option<&mut Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn compiler_exit_error(result: Result<std::io::Result<ExitStatus>, JoinError>) -> MonitorError {
    match result {
        Ok(Ok(status)) => MonitorError::CompilerExited(status),
        Ok(Err(e)) => CompilerError::Wait(e).into(),
        Err(e) => MonitorError::TaskFailed {
            task: "compiler",
            message: e.to_string(),
        },
    }
}

fn syncer_exit_error(result: Result<Result<(), SyncError>, JoinError>) -> MonitorError {
    match result {
        Ok(Ok(())) => MonitorError::SyncerStopped,
        Ok(Err(e)) => e.into(),
        Err(e) => MonitorError::TaskFailed {
            task: "directory syncer",
            message: e.to_string(),
        },
    }
}
