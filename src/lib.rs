//! IsaacScript - watch, compile and sync mods into the game's mods directory.

pub mod compiler;
pub mod config;
pub mod display;
pub mod file;
pub mod monitor;
pub mod notifier;
pub mod project;
pub mod syncer;
