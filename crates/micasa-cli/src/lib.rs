//! micasa - manifest-driven package installer
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Reads a list of wanted packages from a manifest, looks up a JSON
//! blueprint for each, and reports or installs them using the platform's
//! package manager (brew, apt-get, dnf) or a curl install script.
//!
//! # Files
//!
//! ```text
//! ~/.config/micasa/micasa.txt   # manifest: one package per line, optional version spec
//! ./blueprints/<name>.json      # how to detect and install <name>
//! ```

pub mod cmd;
pub mod ui;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "micasa")]
#[command(author, version, about = "micasa - manifest-driven package installer")]
pub struct Cli {
    /// Manifest file [default: $XDG_CONFIG_HOME/micasa/micasa.txt]
    #[arg(long, global = true, env = "MICASA_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Directory containing <package>.json blueprints
    #[arg(long, global = true, env = "MICASA_BLUEPRINTS", default_value = "blueprints")]
    pub blueprints: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Manifest path from the flag, the environment, or the default location.
    pub fn manifest_path(&self) -> Result<PathBuf> {
        match &self.manifest {
            Some(path) => Ok(path.clone()),
            None => micasa_core::paths::default_manifest_path()
                .context("Could not determine home directory. Set MICASA_MANIFEST to override."),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show which manifest packages are missing or unidentified
    Status {
        /// Only check this package
        package: Option<String>,
        /// Also show packages that are installed
        #[arg(short, long)]
        verbose: bool,
    },
    /// Install one manifest package, or every package when none is given
    Install {
        /// Package name
        package: Option<String>,
    },
    /// Remove a package through the platform's package manager
    Uninstall {
        /// Package name
        package: String,
    },
    /// Show platform detection and how a package resolves here
    Info {
        /// Package name
        package: Option<String>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_status_flags() {
        let cli = Cli::parse_from(["micasa", "status", "neovim", "-v", "--blueprints", "/bp"]);
        assert_eq!(cli.blueprints, PathBuf::from("/bp"));
        match cli.command {
            Commands::Status { package, verbose } => {
                assert_eq!(package.as_deref(), Some("neovim"));
                assert!(verbose);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_uninstall() {
        let cli = Cli::parse_from(["micasa", "uninstall", "MyTool"]);
        assert!(matches!(cli.command, Commands::Uninstall { package } if package == "MyTool"));
    }

    #[test]
    fn test_explicit_manifest_wins() {
        let cli = Cli::parse_from(["micasa", "--manifest", "/tmp/m.txt", "install"]);
        assert_eq!(cli.manifest_path().unwrap(), PathBuf::from("/tmp/m.txt"));
    }
}
