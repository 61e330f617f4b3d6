//! Platform detection
//!
//! Identifies the operating system family and, on Linux, the distribution id
//! and version from `/etc/os-release`. The result is normalized into a
//! [`ResolutionKey`] that selects platform-specific blueprint fields.

use std::path::Path;

use micasa_schema::ResolutionKey;

/// Location of the distribution identification file on Linux.
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    /// Apple macOS
    MacOs,
    /// Any Linux distribution
    Linux,
    /// Everything else (Windows, BSDs, ...)
    Other,
}

impl OsFamily {
    /// Map a `std::env::consts::OS` value to a family.
    pub fn from_os_name(os: &str) -> Self {
        match os {
            "macos" => Self::MacOs,
            "linux" => Self::Linux,
            _ => Self::Other,
        }
    }
}

/// Linux distributions with a native install strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Distro {
    /// Ubuntu (apt-get)
    Ubuntu,
    /// Debian (apt-get)
    Debian,
    /// Amazon Linux (dnf)
    AmazonLinux,
}

impl Distro {
    /// The `ID=` value in `/etc/os-release`.
    pub fn os_release_id(&self) -> &'static str {
        match self {
            Self::Ubuntu => "ubuntu",
            Self::Debian => "debian",
            Self::AmazonLinux => "amzn",
        }
    }

    /// Prefix used when building a resolution key.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Self::Ubuntu => "ubuntu",
            Self::Debian => "debian",
            Self::AmazonLinux => "amazonlinux",
        }
    }

    /// Match an `/etc/os-release` `ID=` value.
    pub fn from_os_release_id(id: &str) -> Option<Self> {
        [Self::Ubuntu, Self::Debian, Self::AmazonLinux]
            .into_iter()
            .find(|d| d.os_release_id() == id)
    }
}

impl std::fmt::Display for Distro {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Ubuntu => "Ubuntu",
            Self::Debian => "Debian",
            Self::AmazonLinux => "Amazon Linux",
        };
        f.write_str(label)
    }
}

/// How packages get installed on this platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformClass {
    /// Homebrew
    MacOs,
    /// apt-get on an apt-based distro
    Apt(Distro),
    /// dnf on Amazon Linux
    Dnf,
    /// No install strategy exists
    Unsupported,
}

/// The two fields of `/etc/os-release` that matter here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    /// `ID=` (e.g. `ubuntu`, `amzn`)
    pub id: Option<String>,
    /// `VERSION_ID=` (e.g. `22.04`, `2023`)
    pub version_id: Option<String>,
}

impl OsRelease {
    /// Parse `KEY=value` lines; quotes around values are stripped.
    pub fn parse(content: &str) -> Self {
        let mut release = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            match key.trim() {
                "ID" => release.id = Some(value.to_string()),
                "VERSION_ID" => release.version_id = Some(value.to_string()),
                _ => {}
            }
        }
        release
    }

    /// Read and parse an os-release file. Missing or unreadable files yield
    /// an empty record.
    pub fn read(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                tracing::debug!("could not read {}: {e}", path.display());
                Self::default()
            }
        }
    }
}

/// Detected platform identity. Computed once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    os_name: String,
    family: OsFamily,
    distribution_id: Option<String>,
    version_id: Option<String>,
}

impl Platform {
    /// Detect the running platform.
    pub fn detect() -> Self {
        let os_name = std::env::consts::OS;
        let family = OsFamily::from_os_name(os_name);
        let release = if family == OsFamily::Linux {
            OsRelease::read(Path::new(OS_RELEASE_PATH))
        } else {
            OsRelease::default()
        };
        let platform = Self::new(os_name, family, release);
        tracing::debug!(?platform, "detected platform");
        platform
    }

    /// Build a platform from explicit parts. Distribution data is dropped for
    /// non-Linux families.
    pub fn new(os_name: impl Into<String>, family: OsFamily, release: OsRelease) -> Self {
        let (distribution_id, version_id) = if family == OsFamily::Linux {
            (release.id, release.version_id)
        } else {
            (None, None)
        };
        Self {
            os_name: os_name.into(),
            family,
            distribution_id,
            version_id,
        }
    }

    /// Shorthand for a Linux platform with the given os-release fields.
    pub fn linux(distribution_id: Option<&str>, version_id: Option<&str>) -> Self {
        Self::new(
            "linux",
            OsFamily::Linux,
            OsRelease {
                id: distribution_id.map(str::to_string),
                version_id: version_id.map(str::to_string),
            },
        )
    }

    /// Shorthand for macOS.
    pub fn macos() -> Self {
        Self::new("macos", OsFamily::MacOs, OsRelease::default())
    }

    /// OS name as reported by the standard library (`linux`, `macos`, ...).
    pub fn os_name(&self) -> &str {
        &self.os_name
    }

    /// Operating system family.
    pub fn os_family(&self) -> OsFamily {
        self.family
    }

    /// Linux distribution id, if known.
    pub fn distribution_id(&self) -> Option<&str> {
        self.distribution_id.as_deref()
    }

    /// Linux distribution version, if known.
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    /// The recognised distribution, if any.
    pub fn distro(&self) -> Option<Distro> {
        self.distribution_id().and_then(Distro::from_os_release_id)
    }

    /// Resolution key for `distro`, or `None` if this is not that distro or
    /// its version is unknown.
    ///
    /// Ubuntu and Debian keep only the leading numeric segment of the version
    /// (`22.04` → `ubuntu22`); Amazon Linux keeps it verbatim
    /// (`2023` → `amazonlinux2023`).
    pub fn key_for(&self, distro: Distro) -> Option<ResolutionKey> {
        if self.distro() != Some(distro) {
            return None;
        }
        let version = self.version_id().filter(|v| !v.is_empty())?;
        let version = match distro {
            Distro::Ubuntu | Distro::Debian => version.split('.').next().unwrap_or(version),
            Distro::AmazonLinux => version,
        };
        Some(ResolutionKey::new(format!("{}{version}", distro.key_prefix())))
    }

    /// Resolution key for the running platform.
    pub fn resolution_key(&self) -> Option<ResolutionKey> {
        match self.family {
            OsFamily::MacOs => Some(ResolutionKey::macos()),
            OsFamily::Linux => self.distro().and_then(|d| self.key_for(d)),
            OsFamily::Other => None,
        }
    }

    /// Classify the platform into the install strategy that applies to it.
    pub fn class(&self) -> PlatformClass {
        match (self.family, self.distro()) {
            (OsFamily::MacOs, _) => PlatformClass::MacOs,
            (OsFamily::Linux, Some(d @ (Distro::Ubuntu | Distro::Debian))) => PlatformClass::Apt(d),
            (OsFamily::Linux, Some(Distro::AmazonLinux)) => PlatformClass::Dnf,
            _ => PlatformClass::Unsupported,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.os_name)?;
        if let Some(id) = &self.distribution_id {
            write!(f, " ({id}")?;
            if let Some(version) = &self.version_id {
                write!(f, " {version}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}
