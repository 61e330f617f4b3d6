//! Installed-state detection
//!
//! A package counts as installed when its executable can be located and
//! reports a version. Nothing is ever inferred from package-manager
//! databases.

use micasa_schema::Blueprint;

use crate::context::Context;
use crate::locate::ResolvedExecutable;
use crate::probe::VersionProbe;
use crate::resolver::{resolve_executable_name, resolve_version_regex};

/// What the installed check found for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallState {
    /// The blueprint names no executable for this platform.
    NoExecutable,
    /// The executable is not on `PATH` or in the local bin directory.
    Missing {
        /// Executable name that was searched for.
        executable: String,
    },
    /// The executable exists but no version could be read from it.
    Unidentified {
        /// Executable name.
        executable: String,
        /// Where it was found.
        found: ResolvedExecutable,
    },
    /// The executable exists and reported a version.
    Installed {
        /// Reported version.
        version: String,
        /// Executable name.
        executable: String,
        /// Where it was found.
        found: ResolvedExecutable,
    },
}

impl InstallState {
    /// The detected version, if installed.
    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Installed { version, .. } => Some(version),
            _ => None,
        }
    }

    /// True when a version was detected.
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed { .. })
    }
}

/// Warning shown when an executable lives outside `PATH`.
pub fn outside_path_warning(executable: &str, found: &ResolvedExecutable) -> String {
    format!(
        "'{executable}' found at {} but is not in your PATH. Consider adding {} to your PATH.",
        found.path.display(),
        found.dir().display()
    )
}

/// Determine whether the package described by `bp` is installed.
///
/// Read-only apart from launching the version command; calling it twice
/// without changes to the system yields the same answer.
pub fn installed_state(bp: &Blueprint, ctx: &Context) -> InstallState {
    let key = ctx.key();
    let Some(executable) = resolve_executable_name(bp, key.as_ref()) else {
        return InstallState::NoExecutable;
    };
    let executable = executable.to_string();

    let Some(found) = ctx.locator.locate(&executable) else {
        return InstallState::Missing { executable };
    };
    if found.found_outside_path {
        ctx.reporter.warning(&outside_path_warning(&executable, &found));
    }

    let pattern = resolve_version_regex(bp, key.as_ref());
    let probe = VersionProbe::new(ctx.runner.as_ref());
    match probe.probe(&found.path, &bp.version_check.arg, pattern) {
        Some(version) => {
            tracing::debug!(package = %bp.name, %version, "installed");
            InstallState::Installed {
                version,
                executable,
                found,
            }
        }
        None => InstallState::Unidentified { executable, found },
    }
}
