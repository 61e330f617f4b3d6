//! Status command: which manifest packages are missing or unidentified
use anyhow::Result;
use crossterm::style::Stylize;
use micasa_core::status::{InstallState, installed_state};
use micasa_core::version::VersionConstraint;
use micasa_core::{BlueprintSource, BlueprintStore, Context, ManifestEntry};
use std::path::Path;
use std::sync::Arc;

use crate::ui::{Console, Theme, theme::plural};

/// Check every manifest package (or just `package`) and print the ones that
/// need attention. Installed packages are listed only with `verbose`.
pub fn status(
    manifest: &Path,
    blueprints: &Path,
    package: Option<&str>,
    verbose: bool,
) -> Result<()> {
    let manifest = super::load_manifest(manifest)?;
    let entries = super::select_entries(&manifest, package)?;
    let store = BlueprintStore::new(blueprints);
    let ctx = Context::detect(Arc::new(Console::new()));
    let theme = Theme::default();

    println!("Checking {}...", plural(entries.len(), "package"));
    println!();

    let mut shown = 0;
    for entry in &entries {
        let blueprint = match store.load(&entry.name) {
            Ok(Some(bp)) => bp,
            Ok(None) => {
                ctx.reporter
                    .warning(&format!("No blueprint found for package '{}'", entry.name));
                shown += 1;
                continue;
            }
            Err(e) => {
                ctx.reporter.error(&e.to_string());
                shown += 1;
                continue;
            }
        };

        let state = installed_state(&blueprint, &ctx);
        if state.is_installed() && !verbose {
            continue;
        }

        println!("{}:", entry.name.as_str().with(theme.colors.package_name));
        println!("  Manifest version: {}", manifest_version(entry));
        println!("  Installed version: {}", installed_line(entry, &state));
        println!();
        shown += 1;
    }

    if shown == 0 {
        println!("All packages are installed and working correctly");
    }
    Ok(())
}

fn manifest_version(entry: &ManifestEntry) -> &str {
    entry.version_spec.as_deref().unwrap_or("(any)")
}

fn installed_line(entry: &ManifestEntry, state: &InstallState) -> String {
    match state {
        InstallState::NoExecutable => {
            "Unable to check (no executable specified in blueprint)".to_string()
        }
        InstallState::Missing { executable } => {
            format!("Not found (executable '{executable}' not in PATH)")
        }
        InstallState::Unidentified { executable, found } => format!(
            "Unable to parse version ('{executable}' found at {})",
            found.path.display()
        ),
        InstallState::Installed { version, .. } => {
            format!("{version}{}", constraint_note(entry, version))
        }
    }
}

/// Annotation when the installed version does not meet the manifest spec.
fn constraint_note(entry: &ManifestEntry, installed: &str) -> String {
    let Some(spec) = entry.version_spec.as_deref() else {
        return String::new();
    };
    match VersionConstraint::parse(spec) {
        Ok(constraint) => match constraint.satisfied_by(installed) {
            Some(false) => format!(" (does not satisfy {constraint})"),
            Some(true) | None => String::new(),
        },
        Err(e) => {
            tracing::warn!("{}: {e}", entry.name);
            format!(" ({e})")
        }
    }
}
