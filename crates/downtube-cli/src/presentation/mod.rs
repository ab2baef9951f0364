//! Shared CLI presentation utilities.
//!
//! Keep this module format-only: no domain transforms.

pub mod progress;
pub mod tables;

pub use progress::TerminalProgress;
pub use tables::{format_optional, human_bytes, print_separator, truncate_string};
