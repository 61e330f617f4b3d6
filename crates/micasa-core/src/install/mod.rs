//! Installation engine
//!
//! Drives a package from "maybe installed" to a terminal [`InstallOutcome`]:
//! check for an existing install, classify the platform, hand off to the
//! platform's strategy. The batch entry point adds the one ordering rule the
//! engine knows about: when curl scripts are needed and `curl` itself is a
//! pending manifest entry, `curl` goes first.

mod outcome;
mod session;
mod strategies;

pub use outcome::{FailureReason, InstallOutcome, UninstallOutcome};
pub use session::Session;
pub use strategies::{
    AptStrategy, BrewStrategy, CurlStrategy, DnfStrategy, InstallRequest, InstallStrategy,
    select_strategy,
};

use micasa_schema::{Blueprint, PackageName};

use crate::context::Context;
use crate::manifest::ManifestEntry;
use crate::status::installed_state;
use crate::store::BlueprintSource;

/// Package name of the curl bootstrap.
pub const CURL: &str = "curl";

/// Outcome for one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// Package name from the manifest.
    pub name: PackageName,
    /// What happened.
    pub outcome: InstallOutcome,
}

/// Installs packages on the platform described by a [`Context`].
#[derive(Debug)]
pub struct Installer<'a> {
    ctx: &'a Context,
    strategy: Option<Box<dyn InstallStrategy>>,
}

impl<'a> Installer<'a> {
    /// Installer for the context's platform.
    pub fn new(ctx: &'a Context) -> Self {
        Self {
            ctx,
            strategy: select_strategy(&ctx.platform),
        }
    }

    /// Name of the strategy in use, or `None` on an unsupported platform.
    pub fn strategy_name(&self) -> Option<&'static str> {
        self.strategy.as_ref().map(|s| s.name())
    }

    /// Install one package unless it is already installed.
    pub fn install(&self, blueprint: &Blueprint, session: &mut Session) -> InstallOutcome {
        if let Some(version) = installed_state(blueprint, self.ctx).version() {
            let outcome = InstallOutcome::AlreadyInstalled(version.to_string());
            self.report(&blueprint.name, &outcome);
            return outcome;
        }
        self.dispatch(blueprint, session)
    }

    /// Remove one package through the platform's package manager.
    ///
    /// Packages with no detectable version are left alone.
    pub fn uninstall(&self, blueprint: &Blueprint) -> UninstallOutcome {
        if !installed_state(blueprint, self.ctx).is_installed() {
            return UninstallOutcome::NotInstalled;
        }
        let Some(strategy) = &self.strategy else {
            return UninstallOutcome::Unsupported {
                os: self.ctx.platform.os_name().to_string(),
                distribution: self.ctx.platform.distribution_id().map(str::to_string),
            };
        };

        tracing::debug!(package = %blueprint.name, strategy = strategy.name(), "uninstalling");
        let outcome = strategy.uninstall(&InstallRequest::new(blueprint), self.ctx);
        match &outcome {
            UninstallOutcome::Removed => self.ctx.reporter.done(&blueprint.name, "uninstalled"),
            UninstallOutcome::Failed(reason) => {
                self.ctx.reporter.failed(&blueprint.name, &reason.to_string());
            }
            UninstallOutcome::NotInstalled | UninstallOutcome::Unsupported { .. } => {}
        }
        outcome
    }

    /// Whether installing `blueprint` here would run its curl command.
    pub fn needs_curl(&self, blueprint: &Blueprint) -> bool {
        self.strategy
            .as_ref()
            .is_some_and(|s| s.would_use_curl(blueprint, self.ctx))
    }

    /// Install every manifest entry, in manifest order.
    ///
    /// A failure never stops the batch. The returned results line up with
    /// `entries`.
    pub fn install_batch(
        &self,
        entries: &[ManifestEntry],
        source: &dyn BlueprintSource,
        session: &mut Session,
    ) -> Vec<BatchResult> {
        let reporter = &self.ctx.reporter;
        let mut outcomes: Vec<Option<InstallOutcome>> = vec![None; entries.len()];
        let mut pending: Vec<(usize, Blueprint)> = Vec::new();

        reporter.section("Checking");
        for (idx, entry) in entries.iter().enumerate() {
            let blueprint = match source.load(&entry.name) {
                Ok(Some(bp)) => bp,
                Ok(None) => {
                    let outcome = InstallOutcome::Skipped(format!(
                        "No blueprint found for package '{}'",
                        entry.name
                    ));
                    self.report(&entry.name, &outcome);
                    outcomes[idx] = Some(outcome);
                    continue;
                }
                Err(e) => {
                    let outcome =
                        InstallOutcome::Failed(FailureReason::InvalidBlueprint(e.to_string()));
                    self.report(&entry.name, &outcome);
                    outcomes[idx] = Some(outcome);
                    continue;
                }
            };

            reporter.checking(&entry.name);
            match installed_state(&blueprint, self.ctx).version() {
                Some(version) => {
                    let outcome = InstallOutcome::AlreadyInstalled(version.to_string());
                    self.report(&entry.name, &outcome);
                    outcomes[idx] = Some(outcome);
                }
                None => pending.push((idx, blueprint)),
            }
        }

        if !pending.is_empty() {
            reporter.section("Installing");
        }

        if let Some(pos) = self.curl_first(&pending) {
            let (idx, blueprint) = pending.remove(pos);
            tracing::debug!("installing curl before packages that need it");
            outcomes[idx] = Some(self.dispatch(&blueprint, session));
        }

        for (idx, blueprint) in &pending {
            outcomes[*idx] = Some(self.dispatch(blueprint, session));
        }

        entries
            .iter()
            .zip(outcomes)
            .map(|(entry, outcome)| BatchResult {
                name: entry.name.clone(),
                outcome: outcome.unwrap_or_else(|| {
                    InstallOutcome::Skipped("not processed".to_string())
                }),
            })
            .collect()
    }

    /// Position of the pending `curl` entry when it has to go first.
    fn curl_first(&self, pending: &[(usize, Blueprint)]) -> Option<usize> {
        let wants_curl = pending
            .iter()
            .any(|(_, bp)| bp.name != CURL && self.needs_curl(bp));
        if !wants_curl || self.ctx.locator.exists(CURL) {
            return None;
        }
        pending.iter().position(|(_, bp)| bp.name == CURL)
    }

    /// Platform dispatch for a package known not to be installed.
    fn dispatch(&self, blueprint: &Blueprint, session: &mut Session) -> InstallOutcome {
        let outcome = match &self.strategy {
            Some(strategy) => {
                tracing::debug!(
                    package = %blueprint.name,
                    strategy = strategy.name(),
                    "installing"
                );
                strategy.attempt(&InstallRequest::new(blueprint), self.ctx, session)
            }
            None => InstallOutcome::Unsupported {
                os: self.ctx.platform.os_name().to_string(),
                distribution: self.ctx.platform.distribution_id().map(str::to_string),
            },
        };
        self.report(&blueprint.name, &outcome);
        outcome
    }

    fn report(&self, name: &PackageName, outcome: &InstallOutcome) {
        let reporter = &self.ctx.reporter;
        match outcome {
            InstallOutcome::AlreadyInstalled(version) => {
                reporter.done(name, &format!("already installed (version {version})"));
            }
            InstallOutcome::Installed => reporter.done(name, "installed"),
            InstallOutcome::Skipped(reason) => reporter.warning(reason),
            InstallOutcome::Failed(reason) => reporter.failed(name, &reason.to_string()),
            InstallOutcome::Unsupported { .. } => reporter.failed(name, &outcome.to_string()),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::locate::ExecutableResolver;
    use crate::platform::Platform;
    use crate::process::{CommandOutput, CommandRequest, CommandRunner};
    use crate::reporter::NullReporter;
    use crate::store::MemoryBlueprints;
    use std::sync::Arc;

    struct NeverRun;

    impl CommandRunner for NeverRun {
        fn run(&self, request: &CommandRequest) -> std::io::Result<CommandOutput> {
            panic!("unexpected command: {}", request.display());
        }
    }

    fn context(platform: Platform) -> Context {
        Context::new(
            platform,
            ExecutableResolver::new(None, None),
            Arc::new(NeverRun),
            Arc::new(NullReporter),
        )
    }

    fn blueprint(name: &str, json: &str) -> Blueprint {
        Blueprint::from_json(PackageName::new(name), json).unwrap()
    }

    #[test]
    fn test_unsupported_platform() {
        let ctx = context(Platform::linux(Some("arch"), Some("rolling")));
        let installer = Installer::new(&ctx);
        let bp = blueprint("foo", r#"{"version_check": {"executable": "foo"}}"#);

        assert_eq!(installer.strategy_name(), None);
        assert_eq!(
            installer.install(&bp, &mut Session::new()),
            InstallOutcome::Unsupported {
                os: "linux".to_string(),
                distribution: Some("arch".to_string()),
            }
        );
    }

    #[test]
    fn test_uninstall_skips_missing_package() {
        let ctx = context(Platform::macos());
        let bp = blueprint("foo", r#"{"version_check": {"executable": "foo"}}"#);

        assert_eq!(Installer::new(&ctx).uninstall(&bp), UninstallOutcome::NotInstalled);
    }

    #[test]
    fn test_batch_reports_missing_and_invalid_blueprints() {
        let ctx = context(Platform::linux(Some("arch"), None));
        let installer = Installer::new(&ctx);
        let entries = [ManifestEntry::new("ghost")];

        let results =
            installer.install_batch(&entries, &MemoryBlueprints::new(), &mut Session::new());
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0].outcome, InstallOutcome::Skipped(_)));
    }

    #[test]
    fn test_needs_curl_only_when_native_name_missing() {
        let ctx = context(Platform::macos());
        let installer = Installer::new(&ctx);
        let bp = blueprint("foo", r#"{"package_names": {"curl": "curl x | sh"}}"#);
        // brew never falls back
        assert!(!installer.needs_curl(&bp));
    }
}
