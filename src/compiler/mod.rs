//! Compiler supervision.
//!
//! Spawns the TypeScript-to-Lua compiler, reads its output line by line and
//! classifies each line into a build lifecycle event.

mod events;
mod process;
mod supervisor;

pub use events::*;
pub use process::{
    CompilerProcess, CompilerProcessBuilder, SpawnError, DEFAULT_COMPILER_ARGS,
    DEFAULT_COMPILER_PROGRAM, WATCH_FLAGS,
};
pub use supervisor::{run_once, CompilerError, CompilerHandle, CompilerSupervisor};
