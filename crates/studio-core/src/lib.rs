//! Studio Core — shared errors, traits, and utilities.
//!
//! This crate has no internal Studio dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`traits`]: Configuration abstraction
//! - [`util`]: File discovery and I/O helpers

pub mod error;
pub mod traits;
pub mod util;

pub use error::{Error, Result};
pub use traits::ConfigProvider;
