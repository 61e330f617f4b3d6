//! Command implementations

pub mod completions;
pub mod info;
pub mod install;
pub mod status;
pub mod uninstall;

use anyhow::{Context as _, Result, bail};
use micasa_core::{Manifest, ManifestEntry};
use micasa_schema::PackageName;
use std::path::Path;

/// Load the manifest, turning its errors into user-facing messages.
pub(crate) fn load_manifest(path: &Path) -> Result<Manifest> {
    Manifest::load(path).with_context(|| format!("Failed to load manifest {}", path.display()))
}

/// Manifest entries for `package`, or every entry when it is `None`.
pub(crate) fn select_entries(
    manifest: &Manifest,
    package: Option<&str>,
) -> Result<Vec<ManifestEntry>> {
    let Some(package) = package else {
        return Ok(manifest.entries().to_vec());
    };
    let name = PackageName::new(package);
    let selected: Vec<ManifestEntry> = manifest
        .entries()
        .iter()
        .filter(|e| e.name == name)
        .cloned()
        .collect();
    if selected.is_empty() {
        bail!("Package '{package}' not found in manifest");
    }
    Ok(selected)
}
