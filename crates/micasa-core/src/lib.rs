//! Core engine for micasa.
//!
//! Detects the running platform, resolves blueprints against it, checks
//! whether packages are already installed, and drives installation through
//! brew, apt-get, dnf or a curl script.

pub mod context;
pub mod install;
pub mod locate;
pub mod manifest;
pub mod paths;
pub mod platform;
pub mod probe;
pub mod process;
pub mod reporter;
pub mod resolver;
pub mod status;
pub mod store;
pub mod version;

pub use context::Context;
pub use install::{InstallOutcome, Installer, Session};
pub use manifest::{Manifest, ManifestEntry, ManifestError};
pub use platform::Platform;
pub use reporter::{NullReporter, Reporter};
pub use store::{BlueprintError, BlueprintSource, BlueprintStore};
