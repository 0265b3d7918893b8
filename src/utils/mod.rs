//! Shared helpers that do not belong to a single pipeline stage.
//!
//! - [`fs`]: directory creation and atomic file replacement

pub mod fs;
