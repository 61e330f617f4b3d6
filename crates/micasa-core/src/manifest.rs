//! Manifest parsing
//!
//! The manifest is a plain text list of wanted packages, one per line:
//!
//! ```text
//! # editors
//! neovim: >=0.11.5
//! curl
//! uv: ~=0.9.17
//! ```
//!
//! Order is preserved and duplicates are kept.

use std::path::{Path, PathBuf};

use micasa_schema::PackageName;
use thiserror::Error;

/// Errors from loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// No file at the given path.
    #[error("manifest not found at {}", .0.display())]
    NotFound(PathBuf),
    /// The file exists but could not be read.
    #[error("failed to read manifest {}: {source}", path.display())]
    Io {
        /// Manifest path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A line has a version spec but no package name.
    #[error("empty package name on line {line}")]
    EmptyName {
        /// One-based line number.
        line: usize,
    },
}

/// One wanted package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Package name.
    pub name: PackageName,
    /// Version constraint as written, e.g. `>=0.11.5`. `None` means any.
    pub version_spec: Option<String>,
}

impl ManifestEntry {
    /// Entry with no version constraint.
    pub fn new(name: impl Into<PackageName>) -> Self {
        Self {
            name: name.into(),
            version_spec: None,
        }
    }
}

/// Parsed manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Parse manifest text.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::EmptyName`] for a line like `: >=1.0`.
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        let mut entries = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (name, spec) = match line.split_once(':') {
                Some((name, spec)) => (name.trim(), Some(spec.trim())),
                None => (line, None),
            };
            if name.is_empty() {
                return Err(ManifestError::EmptyName { line: idx + 1 });
            }

            entries.push(ManifestEntry {
                name: PackageName::new(name),
                version_spec: spec.filter(|s| !s.is_empty()).map(str::to_string),
            });
        }

        Ok(Self { entries })
    }

    /// Read and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::NotFound`] if the file does not exist, `Io` for
    /// other read failures, and parse errors from [`Manifest::parse`].
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ManifestError::NotFound(path.to_path_buf())
            } else {
                ManifestError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        let manifest = Self::parse(&content)?;
        tracing::debug!(
            "loaded {} manifest entries from {}",
            manifest.entries.len(),
            path.display()
        );
        Ok(manifest)
    }

    /// Entries in file order.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// True when no packages are listed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// First entry for `name`.
    pub fn find(&self, name: &PackageName) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| &e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_package() {
        let manifest = Manifest::parse("neovim").unwrap();
        assert_eq!(manifest.entries(), &[ManifestEntry::new("neovim")]);
    }

    #[test]
    fn test_parse_package_with_version() {
        let manifest = Manifest::parse("neovim: >=0.11.5").unwrap();
        let entry = &manifest.entries()[0];
        assert_eq!(entry.name, "neovim");
        assert_eq!(entry.version_spec.as_deref(), Some(">=0.11.5"));
    }

    #[test]
    fn test_parse_multiple_preserves_order() {
        let content = r"
neovim: >=0.11.5
curl
eza
uv: ~=0.9.17
";
        let manifest = Manifest::parse(content).unwrap();
        let names: Vec<_> = manifest.entries().iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, ["neovim", "curl", "eza", "uv"]);
        assert_eq!(manifest.entries()[1].version_spec, None);
        assert_eq!(manifest.entries()[3].version_spec.as_deref(), Some("~=0.9.17"));
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let content = "\n# editors\nneovim\n\n\n# network\ncurl\n";
        let manifest = Manifest::parse(content).unwrap();
        assert_eq!(manifest.len(), 2);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let manifest = Manifest::parse("  neovim  :  >=0.11.5  ").unwrap();
        let entry = &manifest.entries()[0];
        assert_eq!(entry.name, "neovim");
        assert_eq!(entry.version_spec.as_deref(), Some(">=0.11.5"));
    }

    #[test]
    fn test_parse_empty_spec_is_any() {
        let manifest = Manifest::parse("jq:").unwrap();
        assert_eq!(manifest.entries()[0].version_spec, None);
    }

    #[test]
    fn test_parse_keeps_duplicates() {
        let manifest = Manifest::parse("jq\njq: >=1.7").unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.find(&PackageName::new("jq")).unwrap().version_spec, None);
    }

    #[test]
    fn test_parse_empty_name_reports_line() {
        let err = Manifest::parse("jq\n# c\n  : >=1.0").unwrap_err();
        assert!(matches!(err, ManifestError::EmptyName { line: 3 }));
    }

    #[test]
    fn test_parse_empty_content() {
        assert!(Manifest::parse("").unwrap().is_empty());
        assert!(Manifest::parse("# only\n# comments\n").unwrap().is_empty());
    }

    #[test]
    fn test_names_keep_their_case() {
        let manifest = Manifest::parse("MyTool").unwrap();
        assert_eq!(manifest.entries()[0].name.as_str(), "MyTool");
        assert!(manifest.find(&PackageName::new("mytool")).is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Manifest::load(&dir.path().join("micasa.txt")).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound(_)));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("micasa.txt");
        std::fs::write(&path, "curl\nneovim: >=0.11\n").unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.len(), 2);
    }
}
