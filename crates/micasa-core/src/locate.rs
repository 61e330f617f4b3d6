//! Executable lookup
//!
//! Searches the process `PATH` first and the per-user local bin directory
//! (`~/.local/bin`) second. Installers driven by curl scripts commonly drop
//! binaries into the latter without touching `PATH`, so a hit there is
//! flagged for a warning rather than treated as missing.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Where an executable was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedExecutable {
    /// Absolute path to the executable.
    pub path: PathBuf,
    /// True when found in the local bin directory rather than on `PATH`.
    pub found_outside_path: bool,
}

impl ResolvedExecutable {
    /// Directory containing the executable.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(&self.path)
    }
}

/// Read-only executable search over `PATH` and the local bin directory.
#[derive(Debug, Clone, Default)]
pub struct ExecutableResolver {
    search_path: Option<OsString>,
    local_bin: Option<PathBuf>,
}

impl ExecutableResolver {
    /// Resolver over explicit search locations.
    pub fn new(search_path: Option<OsString>, local_bin: Option<PathBuf>) -> Self {
        Self {
            search_path,
            local_bin,
        }
    }

    /// Resolver over the process `PATH` and `~/.local/bin`.
    pub fn from_env() -> Self {
        Self::new(std::env::var_os("PATH"), crate::paths::local_bin_dir())
    }

    /// The local bin directory consulted after `PATH`.
    pub fn local_bin(&self) -> Option<&Path> {
        self.local_bin.as_deref()
    }

    /// Find `name` on `PATH`.
    pub fn find_in_path(&self, name: &str) -> Option<PathBuf> {
        let paths = self.search_path.as_ref()?;
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        which::which_in(name, Some(paths), cwd).ok()
    }

    /// Find `name` as an executable regular file in the local bin directory.
    pub fn find_in_local_bin(&self, name: &str) -> Option<PathBuf> {
        let dir = self.local_bin.as_ref()?;
        if !dir.is_dir() {
            return None;
        }
        which::which_in(name, Some(dir.as_os_str()), dir)
            .ok()
            .filter(|p| p.starts_with(dir))
    }

    /// Locate `name`, trying `PATH` then the local bin directory.
    pub fn locate(&self, name: &str) -> Option<ResolvedExecutable> {
        if let Some(path) = self.find_in_path(name) {
            return Some(ResolvedExecutable {
                path,
                found_outside_path: false,
            });
        }

        let path = self.find_in_local_bin(name)?;
        tracing::debug!("'{name}' found outside PATH at {}", path.display());
        Some(ResolvedExecutable {
            path,
            found_outside_path: true,
        })
    }

    /// Whether `name` can be located at all.
    pub fn exists(&self, name: &str) -> bool {
        self.locate(name).is_some()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn make_executable(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\necho ok\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_finds_in_path_first() {
        let path_dir = TempDir::new().unwrap();
        let local_dir = TempDir::new().unwrap();
        let expected = make_executable(path_dir.path(), "tool");
        make_executable(local_dir.path(), "tool");

        let resolver = ExecutableResolver::new(
            Some(path_dir.path().as_os_str().to_owned()),
            Some(local_dir.path().to_path_buf()),
        );
        let found = resolver.locate("tool").unwrap();

        assert_eq!(found.path, expected);
        assert!(!found.found_outside_path);
    }

    #[test]
    fn test_falls_back_to_local_bin() {
        let path_dir = TempDir::new().unwrap();
        let local_dir = TempDir::new().unwrap();
        let expected = make_executable(local_dir.path(), "tool");

        let resolver = ExecutableResolver::new(
            Some(path_dir.path().as_os_str().to_owned()),
            Some(local_dir.path().to_path_buf()),
        );
        let found = resolver.locate("tool").unwrap();

        assert_eq!(found.path, expected);
        assert!(found.found_outside_path);
        assert_eq!(found.dir(), local_dir.path());
    }

    #[test]
    fn test_non_executable_in_local_bin_is_ignored() {
        let local_dir = TempDir::new().unwrap();
        let path = local_dir.path().join("tool");
        std::fs::write(&path, "data").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let resolver = ExecutableResolver::new(None, Some(local_dir.path().to_path_buf()));
        assert!(resolver.locate("tool").is_none());
    }

    #[test]
    fn test_not_found_is_none() {
        let path_dir = TempDir::new().unwrap();
        let resolver =
            ExecutableResolver::new(Some(path_dir.path().as_os_str().to_owned()), None);

        assert!(resolver.locate("definitely-not-here").is_none());
        assert!(!resolver.exists("definitely-not-here"));
    }

    #[test]
    fn test_repeated_lookups_agree() {
        let path_dir = TempDir::new().unwrap();
        make_executable(path_dir.path(), "tool");
        let resolver =
            ExecutableResolver::new(Some(path_dir.path().as_os_str().to_owned()), None);

        assert_eq!(resolver.locate("tool"), resolver.locate("tool"));
    }
}
