//! Filesystem locations and their defaults.

use dirs::home_dir;
use std::path::PathBuf;

/// Directory name under the config home.
const APP_DIR: &str = "micasa";

/// Manifest file name inside [`APP_DIR`].
const MANIFEST_FILE: &str = "micasa.txt";

/// Returns the user's home directory, or None if it cannot be resolved.
pub fn try_home() -> Option<PathBuf> {
    home_dir()
}

/// Returns `$XDG_CONFIG_HOME`, falling back to `~/.config`.
pub fn try_config_home() -> Option<PathBuf> {
    if let Some(val) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(val));
    }
    try_home().map(|h| h.join(".config"))
}

/// Default manifest location: `$XDG_CONFIG_HOME/micasa/micasa.txt`
pub fn default_manifest_path() -> Option<PathBuf> {
    try_config_home().map(|c| c.join(APP_DIR).join(MANIFEST_FILE))
}

/// Default blueprint directory, relative to the working directory.
pub fn default_blueprints_dir() -> PathBuf {
    PathBuf::from("blueprints")
}

/// Per-user bin directory searched after `PATH`: `~/.local/bin`
pub fn local_bin_dir() -> Option<PathBuf> {
    try_home().map(|h| h.join(".local").join("bin"))
}

/// Path to a blueprint file: `<dir>/<name>.json`
pub fn blueprint_file(dir: &std::path::Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}
