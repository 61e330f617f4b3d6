//! Installed-version probing
//!
//! Runs `<executable> <arg>` and pulls a version string out of whatever the
//! program prints. Every failure mode collapses to `None`.

use std::path::Path;
use std::time::Duration;

use regex::Regex;

use crate::process::{CommandRequest, CommandRunner};

/// How long a version command may run before it is killed.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Executes version commands through a [`CommandRunner`].
pub struct VersionProbe<'a> {
    runner: &'a dyn CommandRunner,
    timeout: Duration,
}

impl std::fmt::Debug for VersionProbe<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionProbe")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl<'a> VersionProbe<'a> {
    /// Runner with the default timeout.
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self {
            runner,
            timeout: PROBE_TIMEOUT,
        }
    }

    /// Override the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the executable and extract its version.
    ///
    /// The exit code is ignored; a program that prints its version and exits
    /// non-zero still yields a version.
    pub fn probe(&self, executable: &Path, arg: &str, pattern: Option<&str>) -> Option<String> {
        let request = CommandRequest::exec(executable, [arg]).captured(self.timeout);
        let output = match self.runner.run(&request) {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!("failed to run {}: {e}", executable.display());
                return None;
            }
        };
        if output.timed_out {
            tracing::debug!("{} timed out", request.display());
            return None;
        }
        extract_version(&output.combined(), pattern)
    }
}

/// Pull a version out of command output.
///
/// Without a pattern the trimmed text is the version. With a pattern, the
/// first capture group wins if the pattern has one, otherwise the whole match.
/// Empty results are `None`.
pub fn extract_version(output: &str, pattern: Option<&str>) -> Option<String> {
    let Some(pattern) = pattern else {
        let trimmed = output.trim();
        return (!trimmed.is_empty()).then(|| trimmed.to_string());
    };

    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!("invalid version regex '{pattern}': {e}");
            return None;
        }
    };
    let caps = re.captures(output)?;
    let group = if re.captures_len() > 1 { 1 } else { 0 };
    let found = caps.get(group)?.as_str();
    (!found.is_empty()).then(|| found.to_string())
}
