//! zipsh - a restricted shell over a zip-backed virtual filesystem
//!
//! The shell navigates a directory tree materialized from a zip archive
//! instead of the real disk. `mv` is the only mutation; it rewrites the
//! whole backing archive atomically so the archive and the in-memory tree
//! can never be observed out of sync.

pub mod commands;
pub mod config;
pub mod fs;
pub mod shell;
pub mod system;
