//! Uninstall command
use anyhow::{Context as _, Result};
use micasa_core::install::UninstallOutcome;
use micasa_core::{BlueprintSource, BlueprintStore, Context, Installer, Reporter};
use micasa_schema::PackageName;
use std::path::Path;
use std::sync::Arc;

use crate::ui::Console;

/// Remove `package` through the platform's package manager.
///
/// The package does not have to be in the manifest, only to have a
/// blueprint. Failures are reported and do not make the command fail.
pub fn uninstall(blueprints: &Path, package: &str) -> Result<()> {
    let name = PackageName::new(package);
    let store = BlueprintStore::new(blueprints);
    let blueprint = store
        .load(&name)
        .with_context(|| format!("Failed to load blueprint for '{name}'"))?
        .with_context(|| {
            format!("No blueprint found for package '{name}' in {}", blueprints.display())
        })?;

    let reporter: Arc<dyn Reporter> = Arc::new(Console::new());
    let ctx = Context::detect(reporter.clone());
    let installer = Installer::new(&ctx);

    reporter.section(&format!("Uninstalling {name}"));
    let outcome = installer.uninstall(&blueprint);
    let message = summary(&name, &outcome);
    match outcome {
        UninstallOutcome::Removed | UninstallOutcome::NotInstalled => reporter.info(&message),
        UninstallOutcome::Failed(_) | UninstallOutcome::Unsupported { .. } => {
            reporter.error(&message);
        }
    }
    Ok(())
}

fn summary(name: &PackageName, outcome: &UninstallOutcome) -> String {
    match outcome {
        UninstallOutcome::Removed => format!("Successfully uninstalled '{name}'"),
        UninstallOutcome::NotInstalled => format!("Package '{name}' is not installed"),
        UninstallOutcome::Failed(_) => format!("Failed to uninstall '{name}'"),
        UninstallOutcome::Unsupported { .. } => format!("Failed to uninstall '{name}': {outcome}"),
    }
}
