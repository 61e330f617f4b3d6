//! Info command: platform detection and per-package resolution
use anyhow::{Context as _, Result};
use crossterm::style::Stylize;
use micasa_core::resolver::{
    PackageManager, resolve_executable_name, resolve_package_manager_name, resolve_version_regex,
};
use micasa_core::{BlueprintSource, BlueprintStore, Context, Installer, NullReporter};
use micasa_schema::{Blueprint, PackageName, ResolutionKey};
use std::path::Path;
use std::sync::Arc;

use crate::ui::Theme;

/// Print what micasa detected about this machine and, for `package`, which
/// blueprint values apply here.
pub fn info(blueprints: &Path, package: Option<&str>) -> Result<()> {
    let ctx = Context::detect(Arc::new(NullReporter));
    let theme = Theme::default();
    let installer = Installer::new(&ctx);
    let platform = &ctx.platform;

    let row = |label: &str, value: &str| {
        println!(
            "  {} {}",
            format!("{label:<width$}", width = theme.layout.label_width).with(theme.colors.header),
            value
        );
    };

    println!("{}", "Platform".with(theme.colors.header));
    row("OS", platform.os_name());
    row("Distribution", platform.distribution_id().unwrap_or("-"));
    row("Version", platform.version_id().unwrap_or("-"));
    let key = ctx.key();
    row(
        "Resolution key",
        key.as_ref().map_or("(unsupported)", ResolutionKey::as_str),
    );
    row("Strategy", installer.strategy_name().unwrap_or("(none)"));
    row(
        "Elevation",
        &ctx.elevate
            .as_ref()
            .map_or_else(|| "none".to_string(), |p| p.display().to_string()),
    );

    let Some(package) = package else {
        return Ok(());
    };

    let name = PackageName::new(package);
    let store = BlueprintStore::new(blueprints);
    let blueprint = store
        .load(&name)
        .with_context(|| format!("Failed to load blueprint for '{name}'"))?
        .with_context(|| {
            format!("No blueprint found for package '{name}' in {}", blueprints.display())
        })?;

    println!();
    println!("{}", name.as_str().with(theme.colors.package_name));
    for (label, value) in resolution_rows(&blueprint, &ctx) {
        row(label, &value);
    }
    Ok(())
}

fn resolution_rows(bp: &Blueprint, ctx: &Context) -> Vec<(&'static str, String)> {
    let key = ctx.key();
    let key = key.as_ref();
    let show = |v: Option<&str>| v.unwrap_or("-").to_string();

    let executable = resolve_executable_name(bp, key);
    let located = executable
        .and_then(|e| ctx.locator.locate(e))
        .map_or_else(|| "-".to_string(), |r| r.path.display().to_string());

    vec![
        ("Blueprint version", show(bp.version.as_deref())),
        ("Executable", show(executable)),
        ("Located at", located),
        ("Version arg", bp.version_check.arg.clone()),
        ("Version regex", show(resolve_version_regex(bp, key))),
        (
            "brew",
            show(resolve_package_manager_name(bp, PackageManager::Brew, key)),
        ),
        (
            "apt-get",
            show(resolve_package_manager_name(bp, PackageManager::AptGet, key)),
        ),
        (
            "dnf",
            show(resolve_package_manager_name(bp, PackageManager::Dnf, key)),
        ),
        (
            "curl",
            show(resolve_package_manager_name(bp, PackageManager::Curl, key)),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use micasa_core::Platform;
    use micasa_core::locate::ExecutableResolver;
    use micasa_core::process::SystemRunner;

    #[test]
    fn test_resolution_rows_for_debian() {
        let ctx = Context::new(
            Platform::linux(Some("debian"), Some("12")),
            ExecutableResolver::default(),
            Arc::new(SystemRunner),
            Arc::new(NullReporter),
        );
        let bp = Blueprint::from_json(
            PackageName::new("fd"),
            r#"{"version_check": {"executable": {"debian12": "fdfind", "default": "fd"}},
                "package_names": {"apt-get": {"debian12": "fd-find"}, "brew": "fd"}}"#,
        )
        .unwrap();

        let rows = resolution_rows(&bp, &ctx);
        let get = |label: &str| rows.iter().find(|(l, _)| *l == label).unwrap().1.clone();

        assert_eq!(get("Executable"), "fdfind");
        assert_eq!(get("Located at"), "-");
        assert_eq!(get("Version arg"), "--version");
        assert_eq!(get("apt-get"), "fd-find");
        assert_eq!(get("dnf"), "-");
        assert_eq!(get("brew"), "fd");
    }
}
