//! Utility modules.
//!
//! - [`files`]: Async file discovery, reading and appending

pub mod files;
