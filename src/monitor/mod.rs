//! Monitor orchestration.
//!
//! Loads the configuration, installs the companion mod, then runs the
//! directory syncer and the compiler side by side and relays what they report
//! to the game. Also hosts the one-shot `copy` mode.

mod companion;
mod copy;
mod error;
mod runner;
mod state;

pub use companion::{prepare_companion_mod, touch_save_dat_files};
pub use copy::{copy_mod, CopyOptions};
pub use error::MonitorError;
pub use runner::{Monitor, MonitorOptions, DEFAULT_PING_INTERVAL};
pub use state::{MonitorState, MonitorStateMachine, MonitorStats};
