//! CLI argument parsing and command definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::CONFIG_ENV;

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "studio", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = CONFIG_ENV)]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server.
    Serve {
        /// Port to listen on (overrides config).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind (overrides config).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate a draft and stream it to stdout.
    Generate(GenerateArgs),

    /// Render a markdown file.
    Preview {
        /// File to render; stdin when omitted.
        file: Option<PathBuf>,

        /// Print the HTML fragment instead of JSON.
        #[arg(long)]
        html: bool,
    },

    /// List published posts.
    Posts {
        /// Only posts in this category.
        #[arg(short, long)]
        category: Option<String>,

        /// Only posts matching this text.
        #[arg(short = 'q', long)]
        query: Option<String>,

        /// Ask the configured server instead of reading local files.
        #[arg(long)]
        remote: bool,
    },

    /// Print version information.
    Version,

    /// Check system health.
    Health {
        /// Check the configured server instead of the local setup.
        #[arg(long)]
        remote: bool,
    },

    /// Configuration operations.
    Config(ConfigCommand),
}

/// Options for `generate`.
#[derive(Parser, Debug, Default)]
pub struct GenerateArgs {
    /// What the post is about.
    pub topic: String,

    /// Sales, Marketing or Branding.
    #[arg(short, long)]
    pub category: Option<String>,

    /// Authoritative, Conversational, Data-Driven or Motivational.
    #[arg(short, long)]
    pub tone: Option<String>,

    /// Keywords to work in.
    #[arg(short, long)]
    pub keywords: Option<String>,

    /// Generate through the configured server instead of in-process.
    #[arg(long)]
    pub remote: bool,

    /// Save the finished draft as `<slug>.mdx` in this directory.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Copy the finished draft to the clipboard.
    #[arg(long)]
    pub copy: bool,
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Get a configuration value by dotted key.
    Get {
        /// Dotted key (e.g., "server.port").
        key: String,
    },

    /// Set a configuration value by dotted key.
    Set {
        /// Dotted key (e.g., "server.port").
        key: String,

        /// Value to set.
        value: String,
    },

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker --env flags.
        #[arg(long)]
        docker_env: bool,
    },
}
