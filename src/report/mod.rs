//! Human-readable terminal output.
//!
//! Formatting stays here so the decision code never builds strings for display.

pub mod format;

pub use format::*;
