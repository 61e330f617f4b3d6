//! Blueprint field resolution
//!
//! Pure lookups of a blueprint's platform-conditional fields against a
//! resolution key. `version_check` fields fall back to `default`; the
//! per-manager package-name maps deliberately do not, so a distro release
//! without an explicit entry goes to the curl fallback instead of guessing.

use micasa_schema::{Blueprint, ResolutionKey};

/// Installation method a package name can be looked up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    /// Homebrew
    Brew,
    /// apt-get
    AptGet,
    /// dnf
    Dnf,
    /// Shell command, usually `curl ... | sh`
    Curl,
}

impl PackageManager {
    /// Field name used in blueprint `package_names`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brew => "brew",
            Self::AptGet => "apt-get",
            Self::Dnf => "dnf",
            Self::Curl => "curl",
        }
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Executable used to check whether the package is installed.
pub fn resolve_executable_name<'a>(
    bp: &'a Blueprint,
    key: Option<&ResolutionKey>,
) -> Option<&'a str> {
    let resolved = bp.version_check.executable.as_ref()?.resolve(key);
    tracing::debug!(package = %bp.name, ?key, ?resolved, "resolved executable");
    resolved
}

/// Pattern that extracts the version from the executable's output.
pub fn resolve_version_regex<'a>(
    bp: &'a Blueprint,
    key: Option<&ResolutionKey>,
) -> Option<&'a str> {
    bp.version_check.regex.as_ref()?.resolve(key)
}

/// Package name for `manager`.
///
/// `brew` and `curl` are platform independent and ignore the key. `apt-get`
/// and `dnf` need an exact key match; a `default` entry is never consulted.
pub fn resolve_package_manager_name<'a>(
    bp: &'a Blueprint,
    manager: PackageManager,
    key: Option<&ResolutionKey>,
) -> Option<&'a str> {
    let names = &bp.package_names;
    let resolved = match manager {
        PackageManager::Brew => names.brew.as_deref(),
        PackageManager::Curl => names.curl.as_deref(),
        PackageManager::AptGet => key
            .and_then(|k| names.apt_get.get(k.as_str()))
            .map(String::as_str),
        PackageManager::Dnf => key.and_then(|k| names.dnf.get(k.as_str())).map(String::as_str),
    };
    tracing::debug!(package = %bp.name, %manager, ?key, ?resolved, "resolved package name");
    resolved
}
