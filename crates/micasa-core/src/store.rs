//! Blueprint lookup
//!
//! Blueprints are JSON files named after their package in a single
//! directory. The engine only sees the [`BlueprintSource`] trait, so tests
//! and alternative layouts can supply blueprints from memory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use micasa_schema::{Blueprint, PackageName};
use thiserror::Error;

/// Errors from loading a blueprint that exists but cannot be used.
#[derive(Debug, Error)]
pub enum BlueprintError {
    /// The file could not be read.
    #[error("failed to read blueprint {}: {source}", path.display())]
    Io {
        /// Blueprint path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not a valid blueprint document.
    #[error("invalid blueprint {}: {source}", path.display())]
    Parse {
        /// Blueprint path.
        path: PathBuf,
        /// JSON error.
        source: serde_json::Error,
    },
    /// The package name would resolve outside the blueprint directory.
    #[error("invalid package name '{0}'")]
    InvalidName(String),
}

/// Provider of blueprints by package name.
pub trait BlueprintSource {
    /// Load the blueprint for `name`.
    ///
    /// # Errors
    ///
    /// `Ok(None)` means no blueprint exists; `Err` means one exists but is
    /// unreadable or malformed.
    fn load(&self, name: &PackageName) -> Result<Option<Blueprint>, BlueprintError>;
}

/// Directory of `<name>.json` blueprint files.
#[derive(Debug, Clone)]
pub struct BlueprintStore {
    dir: PathBuf,
}

impl BlueprintStore {
    /// Store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the store reads from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the blueprint for `name` would be read from.
    pub fn path_for(&self, name: &PackageName) -> PathBuf {
        crate::paths::blueprint_file(&self.dir, name.as_str())
    }
}

/// Whether `name` is usable as a single file name inside the store.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains(['/', '\\'])
}

impl BlueprintSource for BlueprintStore {
    fn load(&self, name: &PackageName) -> Result<Option<Blueprint>, BlueprintError> {
        if !is_plain_name(name.as_str()) {
            return Err(BlueprintError::InvalidName(name.to_string()));
        }
        let path = self.path_for(name);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no blueprint at {}", path.display());
                return Ok(None);
            }
            Err(source) => return Err(BlueprintError::Io { path, source }),
        };
        Blueprint::from_json(name.clone(), &content)
            .map(Some)
            .map_err(|source| BlueprintError::Parse { path, source })
    }
}

/// In-memory blueprint source.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlueprints {
    blueprints: BTreeMap<PackageName, Blueprint>,
}

impl MemoryBlueprints {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a blueprint, keyed by its name.
    pub fn insert(&mut self, blueprint: Blueprint) {
        self.blueprints.insert(blueprint.name.clone(), blueprint);
    }
}

impl FromIterator<Blueprint> for MemoryBlueprints {
    fn from_iter<I: IntoIterator<Item = Blueprint>>(iter: I) -> Self {
        let mut source = Self::new();
        for bp in iter {
            source.insert(bp);
        }
        source
    }
}

impl BlueprintSource for MemoryBlueprints {
    fn load(&self, name: &PackageName) -> Result<Option<Blueprint>, BlueprintError> {
        Ok(self.blueprints.get(name).cloned())
    }
}
