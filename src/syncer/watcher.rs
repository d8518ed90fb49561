//! Filesystem watcher driving the mirror.

use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::time::Duration;

use notify::event::{EventKind, ModifyKind, RenameMode};
use notify::{RecursiveMode, Watcher};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::error::SyncError;
use super::events::{FsChange, SyncEvent};
use super::mirror::Mirror;

/// How often the watch loop checks for cancellation while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the initial mirror and then follows the source tree.
#[derive(Debug)]
pub struct DirectorySyncer {
    mirror: Mirror,
}

/// Handle to a running syncer.
#[derive(Debug)]
pub struct SyncerHandle {
    /// Completed sync actions, in the order they were applied.
    pub events: mpsc::UnboundedReceiver<SyncEvent>,
    /// Resolves when the syncer stops. Only an error or cancellation stops it.
    pub task: JoinHandle<Result<(), SyncError>>,
    ready: Option<oneshot::Receiver<()>>,
}

impl SyncerHandle {
    /// Wait until the baseline mirror is in place and the watcher is registered.
    ///
    /// Returns `false` if the syncer failed before getting there; the reason
    /// is available from `task`. Returns `true` immediately on later calls.
    pub async fn ready(&mut self) -> bool {
        match self.ready.take() {
            Some(rx) => rx.await.is_ok(),
            None => true,
        }
    }
}

impl DirectorySyncer {
    #[must_use]
    pub fn new(mirror: Mirror) -> Self {
        Self { mirror }
    }

    /// Start the syncer on a blocking task.
    ///
    /// The initial mirror runs to completion before the watch is registered,
    /// so no event is processed against a half-copied target.
    #[must_use]
    pub fn spawn(self, cancel: CancellationToken) -> SyncerHandle {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();

        let task = tokio::task::spawn_blocking(move || self.run(&event_tx, ready_tx, &cancel));

        SyncerHandle {
            events: event_rx,
            task,
            ready: Some(ready_rx),
        }
    }

    fn run(
        mut self,
        event_tx: &mpsc::UnboundedSender<SyncEvent>,
        ready_tx: oneshot::Sender<()>,
        cancel: &CancellationToken,
    ) -> Result<(), SyncError> {
        self.mirror.initial_sync()?;

        let watch_root: PathBuf = self.mirror.watch_root().to_path_buf();
        let watch_err = |source| SyncError::Watch {
            path: watch_root.clone(),
            source,
        };

        let (notify_tx, notify_rx) = std_mpsc::channel();
        let mut watcher =
            notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
                let _ = notify_tx.send(result);
            })
            .map_err(watch_err)?;
        watcher
            .watch(&watch_root, RecursiveMode::Recursive)
            .map_err(watch_err)?;

        let _ = ready_tx.send(());
        tracing::info!(path = %watch_root.display(), "Watching mod source directory");

        loop {
            if cancel.is_cancelled() {
                tracing::debug!("Directory syncer cancelled");
                break;
            }

            match notify_rx.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(event)) => {
                    tracing::trace!(kind = ?event.kind, paths = ?event.paths, "Filesystem event");
                    for change in translate_event(&event) {
                        tracing::trace!(path = %change.path().display(), "Mirroring change");
                        let Some(sync_event) = self.mirror.apply(&change)? else {
                            continue;
                        };
                        if event_tx.send(sync_event).is_err() {
                            tracing::debug!("Sync event receiver dropped, stopping");
                            return Ok(());
                        }
                    }
                }
                Ok(Err(error)) => {
                    tracing::warn!(error = %error, "File watcher error");
                    let _ = event_tx.send(SyncEvent::error(error.to_string()));
                }
                Err(std_mpsc::RecvTimeoutError::Timeout) => {}
                Err(std_mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }

        drop(watcher);
        Ok(())
    }
}

/// Turn a raw watcher event into the changes to mirror.
///
/// Renames become a removal of the old path and a creation of the new one.
/// Metadata-only and access events produce nothing.
#[must_use]
pub fn translate_event(event: &notify::Event) -> Vec<FsChange> {
    let paths = event.paths.iter().cloned();
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            paths.map(FsChange::Created).collect()
        }
        EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            paths.map(FsChange::Removed).collect()
        }
        // Backends that pair the two halves of a rename also report each
        // half on its own.
        EventKind::Modify(ModifyKind::Name(RenameMode::Both) | ModifyKind::Metadata(_))
        | EventKind::Access(_)
        | EventKind::Any
        | EventKind::Other => Vec::new(),
        EventKind::Modify(ModifyKind::Name(_)) => paths
            .map(|path| {
                if path.exists() {
                    FsChange::Created(path)
                } else {
                    FsChange::Removed(path)
                }
            })
            .collect(),
        EventKind::Modify(_) => paths.map(FsChange::Modified).collect(),
    }
}
