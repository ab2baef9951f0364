//! Command handlers.
//!
//! Each handler takes the composed [`CliContext`](crate::bootstrap::CliContext)
//! and validated options, and owns the printing for its mode.

pub mod formats;
pub mod playlist;
pub mod video;
