//! Filesystem helpers for the mod directories.
//!
//! Thin synchronous wrappers around `std::fs` that attach the failing path to
//! every error, so callers can surface a single descriptive line.

mod error;
mod ops;

pub use error::FsError;
pub use ops::*;
