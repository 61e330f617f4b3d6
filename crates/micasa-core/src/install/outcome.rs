//! Per-package install results

use thiserror::Error;

use crate::platform::Distro;

/// Why an install attempt failed. `Display` is the user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Homebrew is required on macOS but could not be found.
    #[error("'brew' is not installed or not in PATH. Please install Homebrew from https://brew.sh/")]
    BrewMissing,

    /// The blueprint has no `package_names.brew`.
    #[error("No brew package name specified in blueprint")]
    NoBrewName,

    /// The distro's version, and so its resolution key, is unknown.
    #[error("Unable to determine {distro} version")]
    VersionUndetectable {
        /// Distribution whose version is missing.
        distro: Distro,
    },

    /// The native package manager binary could not be found.
    #[error("'{0}' is not installed or not in PATH")]
    ManagerMissing(&'static str),

    /// A curl install was needed but `curl` could not be found.
    #[error("'curl' is not installed or not in PATH")]
    CurlMissing,

    /// Neither a native package name nor a curl command applies.
    #[error("No installation method available for this platform")]
    NoInstallMethod,

    /// The package can only be removed through its native package manager,
    /// and the blueprint names none for this platform.
    #[error("No uninstall method available for this platform")]
    NoUninstallMethod,

    /// The home directory, needed as the curl script's working directory, is unknown.
    #[error("Unable to determine home directory")]
    NoHome,

    /// The blueprint exists but could not be loaded.
    #[error("Invalid blueprint: {0}")]
    InvalidBlueprint(String),

    /// An install command exited non-zero.
    #[error("{command} exited with code {code}")]
    ExitCode {
        /// Command line that failed.
        command: String,
        /// Its exit code.
        code: i32,
    },

    /// An install command was killed before it exited.
    #[error("{command} was terminated by a signal")]
    Terminated {
        /// Command line that was killed.
        command: String,
    },

    /// An install command could not be started.
    #[error("Failed to run {command}: {message}")]
    Launch {
        /// Command line that could not start.
        command: String,
        /// OS error text.
        message: String,
    },
}

/// Terminal state of one package in one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// A version was detected before doing anything.
    AlreadyInstalled(String),
    /// The install command succeeded.
    Installed,
    /// Nothing was attempted (e.g. no blueprint).
    Skipped(String),
    /// The attempt failed.
    Failed(FailureReason),
    /// No strategy exists for this platform.
    Unsupported {
        /// OS name.
        os: String,
        /// Distribution id, when on Linux.
        distribution: Option<String>,
    },
}

impl InstallOutcome {
    /// Installed now or already.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::AlreadyInstalled(_) | Self::Installed)
    }

    /// Short label for summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AlreadyInstalled(_) => "already installed",
            Self::Installed => "installed",
            Self::Skipped(_) => "skipped",
            Self::Failed(_) => "failed",
            Self::Unsupported { .. } => "unsupported",
        }
    }
}

impl std::fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyInstalled(version) => write!(f, "already installed (version {version})"),
            Self::Installed => f.write_str("installed"),
            Self::Skipped(reason) => write!(f, "skipped: {reason}"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
            Self::Unsupported { os, distribution } => {
                write!(f, "installation is not supported on {os}")?;
                if let Some(d) = distribution {
                    write!(f, " ({d})")?;
                }
                Ok(())
            }
        }
    }
}

/// Result of an uninstall request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallOutcome {
    /// No version was detected, so nothing was removed.
    NotInstalled,
    /// The remove command succeeded.
    Removed,
    /// The attempt failed.
    Failed(FailureReason),
    /// No strategy exists for this platform.
    Unsupported {
        /// OS name.
        os: String,
        /// Distribution id, when on Linux.
        distribution: Option<String>,
    },
}

impl std::fmt::Display for UninstallOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInstalled => f.write_str("not installed"),
            Self::Removed => f.write_str("uninstalled"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
            Self::Unsupported { os, distribution } => {
                write!(f, "uninstall is not supported on {os}")?;
                if let Some(d) = distribution {
                    write!(f, " ({d})")?;
                }
                Ok(())
            }
        }
    }
}
