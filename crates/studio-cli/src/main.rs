//! Entry point for the `studio` binary.

use clap::Parser;

use studio_cli::{CliArgs, StudioCli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let cli = StudioCli::from_args(&args)?;
    cli.run(args).await?;
    Ok(())
}
