//! Install command: one manifest package or the whole manifest
use anyhow::{Context as _, Result};
use micasa_core::install::BatchResult;
use micasa_core::{
    BlueprintSource, BlueprintStore, Context, InstallOutcome, Installer, Reporter, Session,
};
use micasa_schema::PackageName;
use std::path::Path;
use std::sync::Arc;

use crate::ui::Console;

/// Install one manifest package, or the whole manifest when `package` is `None`.
///
/// Per-package failures are reported and do not make the command fail.
pub fn install(manifest: &Path, blueprints: &Path, package: Option<&str>) -> Result<()> {
    let manifest = super::load_manifest(manifest)?;
    let entries = super::select_entries(&manifest, package)?;
    let store = BlueprintStore::new(blueprints);
    let reporter: Arc<dyn Reporter> = Arc::new(Console::new());
    let ctx = Context::detect(reporter.clone());
    let installer = Installer::new(&ctx);
    let mut session = Session::new();

    tracing::debug!(platform = %ctx.platform, strategy = ?installer.strategy_name());

    if package.is_some() {
        let name = &entries[0].name;
        return install_one(&installer, &store, name, &mut session, reporter.as_ref());
    }

    if entries.is_empty() {
        reporter.info("Manifest is empty, nothing to install");
        return Ok(());
    }

    let results = installer.install_batch(&entries, &store, &mut session);
    let noun = if results.len() == 1 { "package" } else { "packages" };
    reporter.summary_plain(results.len(), &format!("{noun} processed: {}", tally(&results)));
    Ok(())
}

fn install_one(
    installer: &Installer<'_>,
    store: &BlueprintStore,
    name: &PackageName,
    session: &mut Session,
    reporter: &dyn Reporter,
) -> Result<()> {
    let blueprint = store
        .load(name)
        .with_context(|| format!("Failed to load blueprint for '{name}'"))?;
    let Some(blueprint) = blueprint else {
        reporter.error(&format!("No blueprint found for package '{name}'"));
        return Ok(());
    };

    reporter.section(&format!("Installing {name}"));
    match installer.install(&blueprint, session) {
        InstallOutcome::Installed => reporter.success(&format!("Successfully installed '{name}'")),
        InstallOutcome::Failed(_) | InstallOutcome::Unsupported { .. } => {
            reporter.error(&format!("Failed to install '{name}'"));
        }
        InstallOutcome::AlreadyInstalled(_) | InstallOutcome::Skipped(_) => {}
    }
    Ok(())
}

/// `2 installed, 1 already installed, 1 failed`
fn tally(results: &[BatchResult]) -> String {
    let labels = ["installed", "already installed", "skipped", "failed", "unsupported"];
    labels
        .iter()
        .filter_map(|label| {
            let n = results.iter().filter(|r| r.outcome.label() == *label).count();
            (n > 0).then(|| format!("{n} {label}"))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use micasa_core::install::FailureReason;

    fn result(name: &str, outcome: InstallOutcome) -> BatchResult {
        BatchResult {
            name: PackageName::new(name),
            outcome,
        }
    }

    #[test]
    fn test_tally() {
        let results = [
            result("a", InstallOutcome::AlreadyInstalled("1.0".to_string())),
            result("b", InstallOutcome::Installed),
            result("c", InstallOutcome::Installed),
            result("d", InstallOutcome::Failed(FailureReason::CurlMissing)),
        ];
        assert_eq!(tally(&results), "2 installed, 1 already installed, 1 failed");
    }
}
