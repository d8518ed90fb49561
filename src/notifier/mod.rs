//! Hand-off of status text and console commands to the running game.
//!
//! The companion mod inside the game polls `save<slot>.dat` in its data
//! directory. The CLI appends entries to the JSON array stored there and the
//! companion mod consumes and truncates it.

mod error;
mod game;
mod message;

pub use error::NotifyError;
pub use game::GameNotifier;
pub use message::*;
