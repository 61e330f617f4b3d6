//! Platform install strategies
//!
//! One strategy per platform class. The apt-get and dnf strategies embed a
//! [`CurlStrategy`] and defer to it when the blueprint has no native package
//! name for the exact distro release.

use std::fmt;

use micasa_schema::{Blueprint, PackageName};

use super::outcome::{FailureReason, InstallOutcome, UninstallOutcome};
use super::session::Session;
use crate::context::Context;
use crate::platform::{Distro, Platform, PlatformClass};
use crate::process::CommandRequest;
use crate::resolver::{PackageManager, resolve_package_manager_name};

/// Environment variable keeping apt from prompting.
const APT_FRONTEND: (&str, &str) = ("DEBIAN_FRONTEND", "noninteractive");

/// A package to install.
#[derive(Debug, Clone, Copy)]
pub struct InstallRequest<'a> {
    /// Package name, for reporting.
    pub name: &'a PackageName,
    /// Its blueprint.
    pub blueprint: &'a Blueprint,
}

impl<'a> InstallRequest<'a> {
    /// Request for the package described by `blueprint`.
    pub fn new(blueprint: &'a Blueprint) -> Self {
        Self {
            name: &blueprint.name,
            blueprint,
        }
    }
}

/// A way of installing packages on one platform class.
pub trait InstallStrategy: fmt::Debug {
    /// Short name shown to users (`brew`, `apt-get`, ...).
    fn name(&self) -> &'static str;

    /// Try to install the package. Never panics on external failures; every
    /// problem becomes an [`InstallOutcome`].
    fn attempt(
        &self,
        request: &InstallRequest<'_>,
        ctx: &Context,
        session: &mut Session,
    ) -> InstallOutcome;

    /// Remove the package through this strategy's package manager.
    fn uninstall(&self, request: &InstallRequest<'_>, ctx: &Context) -> UninstallOutcome;

    /// Whether [`attempt`](Self::attempt) would end up running the
    /// blueprint's curl command.
    fn would_use_curl(&self, _blueprint: &Blueprint, _ctx: &Context) -> bool {
        false
    }
}

/// Pick the strategy for `platform`, or `None` when it is unsupported.
pub fn select_strategy(platform: &Platform) -> Option<Box<dyn InstallStrategy>> {
    match platform.class() {
        PlatformClass::MacOs => Some(Box::new(BrewStrategy)),
        PlatformClass::Apt(distro) => Some(Box::new(AptStrategy::new(distro))),
        PlatformClass::Dnf => Some(Box::new(DnfStrategy::new())),
        PlatformClass::Unsupported => None,
    }
}

/// Run one install step, reporting the command line first.
fn run_step(
    ctx: &Context,
    name: &PackageName,
    request: &CommandRequest,
) -> Result<(), FailureReason> {
    let command = request.display();
    ctx.reporter.running(name, &command);
    match ctx.runner.run(request) {
        Ok(output) if output.success() => Ok(()),
        Ok(output) => match output.exit_code {
            Some(code) => Err(FailureReason::ExitCode { command, code }),
            None => Err(FailureReason::Terminated { command }),
        },
        Err(e) => Err(FailureReason::Launch {
            command,
            message: e.to_string(),
        }),
    }
}

fn finish(result: Result<(), FailureReason>) -> InstallOutcome {
    match result {
        Ok(()) => InstallOutcome::Installed,
        Err(reason) => InstallOutcome::Failed(reason),
    }
}

fn finish_removal(result: Result<(), FailureReason>) -> UninstallOutcome {
    match result {
        Ok(()) => UninstallOutcome::Removed,
        Err(reason) => UninstallOutcome::Failed(reason),
    }
}

/// Homebrew on macOS.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrewStrategy;

impl InstallStrategy for BrewStrategy {
    fn name(&self) -> &'static str {
        "brew"
    }

    fn attempt(
        &self,
        request: &InstallRequest<'_>,
        ctx: &Context,
        _session: &mut Session,
    ) -> InstallOutcome {
        let Some(brew) = ctx.locator.locate("brew") else {
            return InstallOutcome::Failed(FailureReason::BrewMissing);
        };
        let Some(formula) =
            resolve_package_manager_name(request.blueprint, PackageManager::Brew, None)
        else {
            return InstallOutcome::Failed(FailureReason::NoBrewName);
        };

        let cmd = CommandRequest::exec(&brew.path, ["install", formula]);
        finish(run_step(ctx, request.name, &cmd))
    }

    fn uninstall(&self, request: &InstallRequest<'_>, ctx: &Context) -> UninstallOutcome {
        let Some(brew) = ctx.locator.locate("brew") else {
            return UninstallOutcome::Failed(FailureReason::BrewMissing);
        };
        let Some(formula) =
            resolve_package_manager_name(request.blueprint, PackageManager::Brew, None)
        else {
            return UninstallOutcome::Failed(FailureReason::NoBrewName);
        };

        let cmd = CommandRequest::exec(&brew.path, ["uninstall", formula]);
        finish_removal(run_step(ctx, request.name, &cmd))
    }
}

/// Shell-script install, usually `curl ... | sh`, run from the home directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlStrategy;

impl InstallStrategy for CurlStrategy {
    fn name(&self) -> &'static str {
        "curl"
    }

    fn attempt(
        &self,
        request: &InstallRequest<'_>,
        ctx: &Context,
        _session: &mut Session,
    ) -> InstallOutcome {
        if !ctx.locator.exists("curl") {
            return InstallOutcome::Failed(FailureReason::CurlMissing);
        }
        let Some(script) =
            resolve_package_manager_name(request.blueprint, PackageManager::Curl, None)
        else {
            return InstallOutcome::Failed(FailureReason::NoInstallMethod);
        };
        let Some(home) = &ctx.home else {
            return InstallOutcome::Failed(FailureReason::NoHome);
        };

        let cmd = CommandRequest::shell(script).current_dir(home);
        finish(run_step(ctx, request.name, &cmd))
    }

    fn uninstall(&self, _request: &InstallRequest<'_>, _ctx: &Context) -> UninstallOutcome {
        UninstallOutcome::Failed(FailureReason::NoUninstallMethod)
    }

    fn would_use_curl(&self, blueprint: &Blueprint, _ctx: &Context) -> bool {
        blueprint.package_names.curl.is_some()
    }
}

/// Native package manager keyed by exact distro release, with curl fallback.
///
/// apt-get and dnf differ only in the binary, the distro, and whether the
/// package index is refreshed first; both go through this.
#[derive(Debug, Clone, Copy)]
struct NativeManager {
    manager: PackageManager,
    distro: Distro,
    refresh_index: bool,
    fallback: CurlStrategy,
}

/// What a native manager decided before running anything.
enum Plan<'a> {
    Fail(FailureReason),
    Fallback,
    Install {
        binary: std::path::PathBuf,
        package: &'a str,
    },
}

impl NativeManager {
    fn plan<'a>(&self, blueprint: &'a Blueprint, ctx: &Context) -> Plan<'a> {
        let Some(key) = ctx.platform.key_for(self.distro) else {
            return Plan::Fail(FailureReason::VersionUndetectable {
                distro: self.distro,
            });
        };
        let binary_name = self.manager.as_str();
        let Some(binary) = ctx.locator.locate(binary_name) else {
            return Plan::Fail(FailureReason::ManagerMissing(binary_name));
        };
        match resolve_package_manager_name(blueprint, self.manager, Some(&key)) {
            Some(package) => Plan::Install {
                binary: binary.path,
                package,
            },
            None => {
                tracing::debug!(
                    package = %blueprint.name,
                    %key,
                    "no {binary_name} package name, falling back to curl"
                );
                Plan::Fallback
            }
        }
    }

    fn command(&self, ctx: &Context, binary: &std::path::Path, args: &[&str]) -> CommandRequest {
        let request = ctx.privileged(binary, args);
        if self.manager == PackageManager::AptGet {
            request.env(APT_FRONTEND.0, APT_FRONTEND.1)
        } else {
            request
        }
    }

    fn attempt(
        &self,
        request: &InstallRequest<'_>,
        ctx: &Context,
        session: &mut Session,
    ) -> InstallOutcome {
        let (binary, package) = match self.plan(request.blueprint, ctx) {
            Plan::Fail(reason) => return InstallOutcome::Failed(reason),
            Plan::Fallback => return self.fallback.attempt(request, ctx, session),
            Plan::Install { binary, package } => (binary, package),
        };

        if self.refresh_index && !session.index_refreshed() {
            let update = self.command(ctx, &binary, &["update"]);
            if let Err(reason) = run_step(ctx, request.name, &update) {
                return InstallOutcome::Failed(reason);
            }
            session.mark_index_refreshed();
        }

        let install = self.command(ctx, &binary, &["install", "-y", package]);
        finish(run_step(ctx, request.name, &install))
    }

    /// Curl scripts leave nothing to remove through the package manager, so a
    /// missing native name fails instead of falling back.
    fn uninstall(&self, request: &InstallRequest<'_>, ctx: &Context) -> UninstallOutcome {
        match self.plan(request.blueprint, ctx) {
            Plan::Fail(reason) => UninstallOutcome::Failed(reason),
            Plan::Fallback => UninstallOutcome::Failed(FailureReason::NoUninstallMethod),
            Plan::Install { binary, package } => {
                let remove = self.command(ctx, &binary, &["remove", "-y", package]);
                finish_removal(run_step(ctx, request.name, &remove))
            }
        }
    }

    fn would_use_curl(&self, blueprint: &Blueprint, ctx: &Context) -> bool {
        matches!(self.plan(blueprint, ctx), Plan::Fallback)
            && self.fallback.would_use_curl(blueprint, ctx)
    }
}

/// apt-get on Ubuntu and Debian.
#[derive(Debug, Clone, Copy)]
pub struct AptStrategy {
    inner: NativeManager,
}

impl AptStrategy {
    /// Strategy for an apt-based distro.
    pub fn new(distro: Distro) -> Self {
        Self {
            inner: NativeManager {
                manager: PackageManager::AptGet,
                distro,
                refresh_index: true,
                fallback: CurlStrategy,
            },
        }
    }

    /// Distro this strategy targets.
    pub fn distro(&self) -> Distro {
        self.inner.distro
    }
}

impl InstallStrategy for AptStrategy {
    fn name(&self) -> &'static str {
        "apt-get"
    }

    fn attempt(
        &self,
        request: &InstallRequest<'_>,
        ctx: &Context,
        session: &mut Session,
    ) -> InstallOutcome {
        self.inner.attempt(request, ctx, session)
    }

    fn uninstall(&self, request: &InstallRequest<'_>, ctx: &Context) -> UninstallOutcome {
        self.inner.uninstall(request, ctx)
    }

    fn would_use_curl(&self, blueprint: &Blueprint, ctx: &Context) -> bool {
        self.inner.would_use_curl(blueprint, ctx)
    }
}

/// dnf on Amazon Linux.
#[derive(Debug, Clone, Copy)]
pub struct DnfStrategy {
    inner: NativeManager,
}

impl DnfStrategy {
    /// Strategy for Amazon Linux.
    pub fn new() -> Self {
        Self {
            inner: NativeManager {
                manager: PackageManager::Dnf,
                distro: Distro::AmazonLinux,
                refresh_index: false,
                fallback: CurlStrategy,
            },
        }
    }
}

impl Default for DnfStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl InstallStrategy for DnfStrategy {
    fn name(&self) -> &'static str {
        "dnf"
    }

    fn attempt(
        &self,
        request: &InstallRequest<'_>,
        ctx: &Context,
        session: &mut Session,
    ) -> InstallOutcome {
        self.inner.attempt(request, ctx, session)
    }

    fn uninstall(&self, request: &InstallRequest<'_>, ctx: &Context) -> UninstallOutcome {
        self.inner.uninstall(request, ctx)
    }

    fn would_use_curl(&self, blueprint: &Blueprint, ctx: &Context) -> bool {
        self.inner.would_use_curl(blueprint, ctx)
    }
}
