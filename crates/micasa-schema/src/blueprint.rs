//! Blueprint definition parsing
//!
//! A blueprint is stored as `<name>.json`:
//!
//! ```json
//! {
//!   "version": "0.11.5",
//!   "version_check": {
//!     "executable": { "ubuntu22": "nvim-cli", "default": "nvim" },
//!     "arg": "--version",
//!     "regex": "NVIM v([0-9.]+)"
//!   },
//!   "package_names": {
//!     "brew": "neovim",
//!     "apt-get": { "ubuntu24": "neovim" },
//!     "dnf": { "amazonlinux2023": "neovim" },
//!     "curl": "curl -fsSL https://example.com/install.sh | sh"
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::{PackageName, ResolutionKey};

/// Key consulted when a platform map has no entry for the current platform.
pub const DEFAULT_KEY: &str = "default";

/// Argument passed to an executable when the blueprint does not specify one.
pub const DEFAULT_VERSION_ARG: &str = "--version";

/// A blueprint field that is either fixed or varies by platform.
///
/// Decoded once at load time from either a JSON string or a JSON object keyed
/// by [`ResolutionKey`]. The `default` entry of an object is split out so that
/// resolution is a single match instead of a map lookup for a magic key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawPlatformValue")]
pub enum PlatformValue {
    /// The same value on every platform.
    Fixed(String),
    /// Per-platform values with an optional fallback.
    PerPlatform {
        /// Entries keyed by exact resolution key.
        entries: BTreeMap<String, String>,
        /// Value of the `default` entry, if any.
        default: Option<String>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPlatformValue {
    Fixed(String),
    PerPlatform(BTreeMap<String, String>),
}

impl From<RawPlatformValue> for PlatformValue {
    fn from(raw: RawPlatformValue) -> Self {
        match raw {
            RawPlatformValue::Fixed(value) => Self::Fixed(value),
            RawPlatformValue::PerPlatform(mut entries) => {
                let default = entries.remove(DEFAULT_KEY);
                Self::PerPlatform { entries, default }
            }
        }
    }
}

impl PlatformValue {
    /// Resolve against a platform key.
    ///
    /// A fixed value ignores the key. A per-platform value tries the exact key,
    /// then `default`; `None` means the value cannot be determined here.
    pub fn resolve(&self, key: Option<&ResolutionKey>) -> Option<&str> {
        match self {
            Self::Fixed(value) => Some(value.as_str()),
            Self::PerPlatform { entries, default } => key
                .and_then(|k| entries.get(k.as_str()))
                .or(default.as_ref())
                .map(String::as_str),
        }
    }
}

/// How to find and interrogate the installed executable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VersionCheck {
    /// Executable name, fixed or per platform.
    pub executable: Option<PlatformValue>,
    /// Single argument that makes the executable print its version.
    pub arg: String,
    /// Pattern extracting the version from the executable's output.
    pub regex: Option<PlatformValue>,
}

impl Default for VersionCheck {
    fn default() -> Self {
        Self {
            executable: None,
            arg: DEFAULT_VERSION_ARG.to_string(),
            regex: None,
        }
    }
}

/// Package names understood by each installation method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PackageNames {
    /// Homebrew formula name.
    pub brew: Option<String>,
    /// apt-get package names keyed by distro+version key (`ubuntu24`, `debian12`).
    #[serde(rename = "apt-get")]
    pub apt_get: BTreeMap<String, String>,
    /// dnf package names keyed by Amazon Linux key (`amazonlinux2023`).
    pub dnf: BTreeMap<String, String>,
    /// Shell command that installs the package, typically `curl ... | sh`.
    pub curl: Option<String>,
}

/// Complete blueprint for one package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Blueprint {
    /// Package this blueprint describes. Taken from the file name, not the JSON.
    #[serde(skip)]
    pub name: PackageName,
    /// Informational version; carries no meaning for detection or install.
    #[serde(default)]
    pub version: Option<String>,
    /// Installed-version detection.
    #[serde(default)]
    pub version_check: VersionCheck,
    /// Per-method package names.
    #[serde(default)]
    pub package_names: PackageNames,
}

impl Blueprint {
    /// Parse a blueprint document for `name`.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the document is malformed or a field has the
    /// wrong shape.
    pub fn from_json(name: PackageName, content: &str) -> Result<Self, serde_json::Error> {
        let mut blueprint: Blueprint = serde_json::from_str(content)?;
        blueprint.name = name;
        Ok(blueprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_BLUEPRINT: &str = r#"
{
  "version": "0.11.5",
  "version_check": {
    "executable": { "ubuntu22": "nvim-cli", "default": "nvim" },
    "regex": "NVIM v([0-9.]+)"
  },
  "package_names": {
    "brew": "neovim",
    "apt-get": { "ubuntu24": "neovim", "default": "neovim-any" },
    "dnf": { "amazonlinux2023": "neovim" },
    "curl": "curl -fsSL https://example.com/nvim.sh | sh"
  }
}
"#;

    #[test]
    fn test_parse_blueprint() {
        let bp = Blueprint::from_json(PackageName::new("neovim"), EXAMPLE_BLUEPRINT).unwrap();

        assert_eq!(bp.name, "neovim");
        assert_eq!(bp.version.as_deref(), Some("0.11.5"));
        assert_eq!(bp.version_check.arg, "--version");
        assert_eq!(bp.package_names.brew.as_deref(), Some("neovim"));
        assert_eq!(
            bp.package_names.apt_get.get("ubuntu24").map(String::as_str),
            Some("neovim")
        );
        // "default" is an ordinary key inside package-manager maps
        assert!(bp.package_names.apt_get.contains_key("default"));
    }

    #[test]
    fn test_platform_map_splits_out_default() {
        let bp = Blueprint::from_json(PackageName::new("neovim"), EXAMPLE_BLUEPRINT).unwrap();

        let Some(PlatformValue::PerPlatform { entries, default }) = bp.version_check.executable
        else {
            panic!("expected a per-platform executable");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(default.as_deref(), Some("nvim"));
    }

    #[test]
    fn test_minimal_blueprint_uses_defaults() {
        let bp = Blueprint::from_json(PackageName::new("jq"), "{}").unwrap();

        assert_eq!(bp.version_check, VersionCheck::default());
        assert!(bp.package_names.apt_get.is_empty());
        assert!(bp.package_names.curl.is_none());
    }

    #[test]
    fn test_resolve_fixed_ignores_key() {
        let value = PlatformValue::Fixed("rg".to_string());
        assert_eq!(value.resolve(None), Some("rg"));
        assert_eq!(value.resolve(Some(&ResolutionKey::macos())), Some("rg"));
    }

    #[test]
    fn test_resolve_per_platform_prefers_exact_key() {
        let value: PlatformValue =
            serde_json::from_str(r#"{"macos": "gsed", "default": "sed"}"#).unwrap();

        assert_eq!(value.resolve(Some(&ResolutionKey::macos())), Some("gsed"));
        assert_eq!(
            value.resolve(Some(&ResolutionKey::new("ubuntu24"))),
            Some("sed")
        );
        assert_eq!(value.resolve(None), Some("sed"));
    }

    #[test]
    fn test_resolve_per_platform_without_default() {
        let value: PlatformValue = serde_json::from_str(r#"{"macos": "gsed"}"#).unwrap();
        assert_eq!(value.resolve(Some(&ResolutionKey::new("debian12"))), None);
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let err = Blueprint::from_json(
            PackageName::new("bad"),
            r#"{"version_check": {"executable": 42}}"#,
        );
        assert!(err.is_err());
    }
}
