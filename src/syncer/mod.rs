//! Directory syncer.
//!
//! Mirrors the compiled mod directory into the game's mods directory: one full
//! copy at startup, then one incremental copy or delete per filesystem event.
//! The watcher runs on its own blocking task and reports back over a channel.

mod error;
mod events;
mod mirror;
mod watcher;

pub use error::SyncError;
pub use events::{FsChange, SyncEvent, SyncEventKind};
pub use mirror::Mirror;
pub use watcher::{translate_event, DirectorySyncer, SyncerHandle};
