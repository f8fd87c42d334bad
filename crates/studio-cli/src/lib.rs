//! The `studio` command-line tool.
//!
//! Serves the Content Studio API, generates drafts from the terminal,
//! renders previews, lists published posts, and manages configuration.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;

pub use app::StudioCli;
pub use cli::{CliArgs, Command, ConfigAction, ConfigCommand, GenerateArgs};
pub use config::StudioConfig;
