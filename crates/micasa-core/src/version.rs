//! Manifest version constraints
//!
//! Specs are PEP 440 specifier sets such as `>=0.11.5`, `~=0.9.17`,
//! `==0.11.*` or `>=1.0,<2.0`; a bare version means `==`. Installed version
//! strings reported by tools are messy (`7.81.0-1ubuntu1.18`, `v2.4`), so the
//! distro suffix is stripped before comparison. Constraints only annotate
//! status output; they never decide whether something gets installed.

use std::fmt;
use std::str::FromStr;

use pep440_rs::{Version, VersionSpecifiers};
use thiserror::Error;

/// Errors from parsing a constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// The spec is not a valid PEP 440 specifier set.
    #[error("invalid version spec '{spec}': {message}")]
    InvalidSpec {
        /// Spec as written in the manifest.
        spec: String,
        /// First line of the parser's diagnostic.
        message: String,
    },
}

/// Parsed manifest version spec.
#[derive(Debug, Clone)]
pub struct VersionConstraint {
    raw: String,
    specifiers: Option<VersionSpecifiers>,
}

impl VersionConstraint {
    /// Constraint that accepts everything.
    pub fn any() -> Self {
        Self {
            raw: String::new(),
            specifiers: None,
        }
    }

    /// Parse a spec. Empty or `*` accepts any version.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::InvalidSpec`] if the specifier set is malformed.
    pub fn parse(spec: &str) -> Result<Self, VersionError> {
        let raw = spec.trim();
        if raw.is_empty() || raw == "*" {
            return Ok(Self::any());
        }

        let specifiers = VersionSpecifiers::from_str(&with_operators(raw)).map_err(|e| {
            VersionError::InvalidSpec {
                spec: raw.to_string(),
                message: e.to_string().lines().next().unwrap_or_default().to_string(),
            }
        })?;

        Ok(Self {
            raw: raw.to_string(),
            specifiers: Some(specifiers),
        })
    }

    /// True when the constraint accepts every version.
    pub fn is_any(&self) -> bool {
        self.specifiers.is_none()
    }

    /// Whether an installed version string satisfies every clause.
    ///
    /// `None` when the installed string holds no recognizable version.
    pub fn satisfied_by(&self, installed: &str) -> Option<bool> {
        let Some(specifiers) = &self.specifiers else {
            return Some(true);
        };
        let version = normalize_installed(installed)?;
        Some(specifiers.contains(&version))
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            f.write_str("(any)")
        } else {
            f.write_str(&self.raw)
        }
    }
}

impl FromStr for VersionConstraint {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Prefix bare-version clauses with `==`.
fn with_operators(spec: &str) -> String {
    spec.split(',')
        .map(str::trim)
        .map(|clause| {
            if clause.starts_with(|c: char| c.is_ascii_digit()) {
                format!("=={clause}")
            } else {
                clause.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a tool-reported version, dropping any distro suffix.
///
/// `7.81.0-1ubuntu1.18` becomes `7.81.0`, `v2.4` becomes `2.4`. When the
/// remaining text is not PEP 440, its leading numeric run is used.
pub fn normalize_installed(installed: &str) -> Option<Version> {
    let start = installed.find(|c: char| c.is_ascii_digit())?;
    let tail = &installed[start..];

    let token = tail
        .split(|c: char| c == '-' || c.is_whitespace())
        .next()
        .unwrap_or(tail)
        .trim_end_matches('.');
    if let Ok(version) = Version::from_str(token) {
        return Some(version);
    }

    let end = tail
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(tail.len());
    Version::from_str(tail[..end].trim_end_matches('.')).ok()
}
