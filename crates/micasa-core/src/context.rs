//! Shared engine context.
//!
//! Groups the per-run collaborators (platform identity, executable lookup,
//! process runner, reporter) so strategies take one argument instead of
//! five.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use micasa_schema::ResolutionKey;

use crate::locate::ExecutableResolver;
use crate::platform::Platform;
use crate::process::{CommandRequest, CommandRunner, SystemRunner};
use crate::reporter::Reporter;

/// Proc file holding the effective uid on Linux.
const PROC_STATUS: &str = "/proc/self/status";

/// Groups common state used during status and install operations.
#[derive(Clone)]
pub struct Context {
    /// Detected platform, computed once per run.
    pub platform: Arc<Platform>,
    /// Executable lookup over `PATH` and `~/.local/bin`.
    pub locator: ExecutableResolver,
    /// Launches external commands.
    pub runner: Arc<dyn CommandRunner>,
    /// Receives progress output.
    pub reporter: Arc<dyn Reporter>,
    /// User home directory, used as the working directory for curl scripts.
    pub home: Option<PathBuf>,
    /// `sudo` binary used to elevate package-manager commands.
    pub elevate: Option<PathBuf>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("platform", &self.platform)
            .field("locator", &self.locator)
            .field("home", &self.home)
            .field("elevate", &self.elevate)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Context with explicit collaborators and no elevation.
    pub fn new(
        platform: Platform,
        locator: ExecutableResolver,
        runner: Arc<dyn CommandRunner>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            platform: Arc::new(platform),
            locator,
            runner,
            reporter,
            home: None,
            elevate: None,
        }
    }

    /// Context for the running system: detected platform, process `PATH`,
    /// real processes, and `sudo` when not already root.
    pub fn detect(reporter: Arc<dyn Reporter>) -> Self {
        let locator = ExecutableResolver::from_env();
        let elevate = if is_root() {
            None
        } else {
            locator.locate("sudo").map(|s| s.path)
        };
        Self::new(Platform::detect(), locator, Arc::new(SystemRunner), reporter)
            .with_home(crate::paths::try_home())
            .with_elevation(elevate)
    }

    /// Set the home directory.
    #[must_use]
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// Set the elevation helper.
    #[must_use]
    pub fn with_elevation(mut self, sudo: Option<PathBuf>) -> Self {
        self.elevate = sudo;
        self
    }

    /// Resolution key of the detected platform.
    pub fn key(&self) -> Option<ResolutionKey> {
        self.platform.resolution_key()
    }

    /// Request for a package-manager command, prefixed with `sudo` when
    /// elevation is configured.
    pub fn privileged(&self, program: &Path, args: &[&str]) -> CommandRequest {
        match &self.elevate {
            Some(sudo) => {
                let mut full: Vec<OsString> = Vec::with_capacity(args.len() + 1);
                full.push(program.as_os_str().to_owned());
                full.extend(args.iter().map(OsString::from));
                CommandRequest::exec(sudo, full)
            }
            None => CommandRequest::exec(program, args.iter().copied()),
        }
    }
}

/// Whether the process runs with effective uid 0.
///
/// Reads `/proc/self/status`; systems without procfs are treated as non-root.
pub fn is_root() -> bool {
    std::fs::read_to_string(PROC_STATUS)
        .ok()
        .is_some_and(|status| effective_uid(&status) == Some(0))
}

fn effective_uid(status: &str) -> Option<u32> {
    let line = status.lines().find(|l| l.starts_with("Uid:"))?;
    // Uid: real effective saved fs
    line.split_whitespace().nth(2)?.parse().ok()
}
