//! micasa - manifest-driven package installer

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use micasa_cli::cmd;
use micasa_cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Status { package, verbose } => cmd::status::status(
            &cli.manifest_path()?,
            &cli.blueprints,
            package.as_deref(),
            *verbose,
        ),
        Commands::Install { package } => {
            cmd::install::install(&cli.manifest_path()?, &cli.blueprints, package.as_deref())
        }
        Commands::Uninstall { package } => cmd::uninstall::uninstall(&cli.blueprints, package),
        Commands::Info { package } => cmd::info::info(&cli.blueprints, package.as_deref()),
        Commands::Completions { shell } => {
            cmd::completions::completions(*shell);
            Ok(())
        }
    }
}
