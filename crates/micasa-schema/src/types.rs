//! Core newtypes shared across crates.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// A package name as written in the manifest.
///
/// Kept verbatim: `MyTool` in a manifest refers to `MyTool.json` on disk.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PackageName(String);

impl PackageName {
    /// Create a new package name.
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Return the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for PackageName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for PackageName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PackageName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for PackageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PackageName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PackageName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Normalized platform identifier used to select platform-specific blueprint
/// fields.
///
/// Produced once per run by platform detection. Known shapes are `macos`,
/// `ubuntu<major>`, `debian<major>` and `amazonlinux<version>`; an
/// unsupported platform has no key at all (`Option::None` at the call site).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResolutionKey(String);

impl ResolutionKey {
    /// Key used for every macOS release.
    pub const MACOS: &'static str = "macos";

    /// Wrap an already-normalized key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The macOS key.
    pub fn macos() -> Self {
        Self::new(Self::MACOS)
    }

    /// Return the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResolutionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResolutionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ResolutionKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_name_keeps_case() {
        let name = PackageName::new("MyTool");
        assert_eq!(name.as_str(), "MyTool");
        assert_eq!(name, "MyTool");
        assert_ne!(name, "mytool");
    }

    #[test]
    fn test_resolution_key_display() {
        assert_eq!(ResolutionKey::macos().to_string(), "macos");
        assert_eq!(ResolutionKey::new("ubuntu24").as_str(), "ubuntu24");
    }
}
