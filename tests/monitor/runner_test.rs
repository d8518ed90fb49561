//! Integration tests for the monitor runner.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use isaacscript::compiler::CompilerProcessBuilder;
use isaacscript::config::{Config, ConfigLoader, SaveSlot};
use isaacscript::monitor::{Monitor, MonitorError, MonitorOptions, MonitorState};
use isaacscript::notifier::{GameNotifier, MessageType, NotificationMessage};
use isaacscript::project::ProjectError;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

struct Fixture {
    _temp_dir: TempDir,
    project: PathBuf,
    mods: PathBuf,
    watcher_mod: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let mods = temp_dir.path().join("game").join("mods");
        fs::create_dir_all(&mods).unwrap();

        let watcher_mod = temp_dir.path().join("bundled").join("isaacscript-watcher");
        fs::create_dir_all(&watcher_mod).unwrap();
        fs::write(watcher_mod.join("main.lua"), "-- watcher").unwrap();

        let project = temp_dir.path().join("my-mod");
        fs::create_dir_all(project.join("mod")).unwrap();
        ConfigLoader::new(&project)
            .create(&Config::new(&mods, SaveSlot::new(2).unwrap()))
            .unwrap();

        Self {
            _temp_dir: temp_dir,
            project,
            mods,
            watcher_mod,
        }
    }

    fn options(&self, script: &str) -> MonitorOptions {
        let mut options = MonitorOptions::new(&self.project);
        options.skip_project_checks = true;
        options.watcher_mod_source_dir = Some(self.watcher_mod.clone());
        options.compiler = CompilerProcessBuilder::new("sh").args(&["-c", script]);
        options.ping_interval = None;
        options.echo = false;
        options
    }
}

async fn wait_for(timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    done()
}

fn read_text(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

#[test]
fn prepare_installs_companion_mod() {
    let fx = Fixture::new();

    let monitor = Monitor::prepare(&fx.options("true")).unwrap();

    assert_eq!(monitor.state(), MonitorState::PreparingCompanionMod);
    assert_eq!(monitor.layout().mod_target_dir, fx.mods.join("my-mod"));
    assert_eq!(
        read_text(&fx.mods.join("isaacscript-watcher").join("main.lua")).as_deref(),
        Some("-- watcher")
    );
    assert!(monitor.notifier().path().ends_with("save2.dat"));
    assert!(monitor.notifier().path().is_file());
}

#[test]
fn prepare_fails_without_companion_mod() {
    let fx = Fixture::new();
    let mut options = fx.options("true");
    options.watcher_mod_source_dir = Some(fx.project.join("missing"));

    assert!(matches!(
        Monitor::prepare(&options),
        Err(MonitorError::CompanionModMissing(_))
    ));
}

#[test]
fn prepare_runs_project_checks_unless_skipped() {
    let fx = Fixture::new();
    let mut options = fx.options("true");
    options.skip_project_checks = false;

    assert!(matches!(
        Monitor::prepare(&options),
        Err(MonitorError::Project(ProjectError::NoPackageJson(_)))
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn monitor_relays_compile_cycle_to_game() {
    let fx = Fixture::new();
    let options = fx.options(
        "echo 'Starting compilation in watch mode...'; \
         printf '%s' '-- compiled' > mod/main.lua; \
         echo 'Found 0 errors. Watching for file changes.'; \
         exec sleep 30",
    );
    let monitor = Monitor::prepare(&options).unwrap();
    let notifier = GameNotifier::new(monitor.notifier().path());
    let target_main = monitor.layout().mod_target_dir.join("main.lua");

    let cancel = CancellationToken::new();
    let run = tokio::spawn(monitor.run(cancel.clone()));

    let delivered = wait_for(Duration::from_secs(10), || {
        run.is_finished()
            || notifier
                .read_entries()
                .iter()
                .any(|entry| entry.data.contains("Successfully compiled & reloaded!"))
    })
    .await;
    assert!(delivered, "no success message was written");

    if run.is_finished() {
        match run.await.unwrap() {
            // No filesystem watcher is available here.
            Err(MonitorError::Sync(_)) => return,
            other => panic!("monitor stopped early: {other:?}"),
        }
    }

    let entries = notifier.read_entries();
    assert!(entries[0]
        .data
        .ends_with("IsaacScript is now watching for changes."));
    assert!(entries[1]
        .data
        .ends_with("Compiling the mod for the first time..."));
    assert!(entries.contains(&NotificationMessage::command("luamod my-mod")));
    assert!(entries.contains(&NotificationMessage::command("restart")));
    assert!(entries.iter().all(|entry| entry.kind != MessageType::Ping));

    let synced = wait_for(Duration::from_secs(10), || {
        read_text(&target_main).as_deref() == Some("-- compiled")
    })
    .await;
    assert!(synced, "main.lua was not mirrored");

    cancel.cancel();
    let result = tokio::time::timeout(Duration::from_secs(10), run)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}

#[cfg(unix)]
#[tokio::test]
async fn monitor_fails_when_compiler_exits() {
    let fx = Fixture::new();
    let monitor = Monitor::prepare(&fx.options("exit 0")).unwrap();

    let result = tokio::time::timeout(
        Duration::from_secs(10),
        monitor.run(CancellationToken::new()),
    )
    .await
    .unwrap();

    match result {
        Err(MonitorError::CompilerExited(status)) => assert!(status.success()),
        Err(MonitorError::Sync(_)) => {}
        other => panic!("unexpected result: {other:?}"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn monitor_fails_when_game_file_unwritable_during_output_burst() {
    let fx = Fixture::new();
    let monitor = Monitor::prepare(&fx.options(
        "i=0; while [ $i -lt 2000 ]; do echo \"src/main.ts: error $i\"; i=$((i+1)); done; \
         exec sleep 30",
    ))
    .unwrap();
    let save_dat = monitor.notifier().path().to_path_buf();
    fs::remove_file(&save_dat).unwrap();
    fs::create_dir(&save_dat).unwrap();

    let result = tokio::time::timeout(
        Duration::from_secs(20),
        monitor.run(CancellationToken::new()),
    )
    .await
    .expect("monitor did not stop after the write failure");

    match result {
        Err(MonitorError::Notify(_) | MonitorError::Sync(_)) => {}
        other => panic!("unexpected result: {other:?}"),
    }
}
