//! Project configuration (`isaacscript.json`).

mod jsonc;
mod loader;
mod types;

pub use jsonc::strip_jsonc;
pub use loader::*;
pub use types::*;
