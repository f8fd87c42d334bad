//! The `studio` application: logging setup and command dispatch.

use tracing_subscriber::EnvFilter;

use studio_core::Result;

use crate::cli::{CliArgs, Command};
use crate::config::StudioConfig;
use crate::{commands, config_handlers};

/// The CLI application with its loaded configuration.
pub struct StudioCli {
    config: StudioConfig,
    version: String,
}

impl StudioCli {
    /// Create from CLI args, loading config from file and environment.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        Ok(Self::new(StudioConfig::load(args.config.as_deref())?))
    }

    /// Create with an explicit configuration.
    pub fn new(config: StudioConfig) -> Self {
        Self {
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// The loaded configuration.
    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// `RUST_LOG` wins when set; otherwise the verbosity flags pick the level.
    pub fn init_logging(verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // A subscriber may already be set, e.g. in tests.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Run the CLI with the given arguments.
    pub async fn run(self, args: CliArgs) -> Result<()> {
        Self::init_logging(args.verbose, args.quiet);

        match args.command {
            Some(Command::Version) => {
                println!("studio {}", self.version);
                Ok(())
            }
            Some(Command::Serve { port, host }) => commands::serve(self.config, host, port).await,
            Some(Command::Generate(generate)) => commands::generate(&self.config, generate).await,
            Some(Command::Preview { file, html }) => {
                commands::preview(&self.config, file.as_deref(), html).await
            }
            Some(Command::Posts {
                category,
                query,
                remote,
            }) => commands::posts(&self.config, category.as_deref(), query.as_deref(), remote).await,
            Some(Command::Health { remote }) => commands::health(&self.config, remote).await,
            Some(Command::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)
            }
            None => {
                println!("studio {}: use --help for usage", self.version);
                Ok(())
            }
        }
    }
}
