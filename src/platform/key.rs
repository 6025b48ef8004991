use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::PlatformError;

/// Operating system family of a release artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OsFamily {
    #[serde(rename = "darwin", alias = "macos")]
    MacOs,
    #[serde(rename = "linux")]
    Linux,
    #[serde(rename = "windows")]
    Windows,
}

impl OsFamily {
    /// The OS the binary was compiled for, if it is one we can name.
    pub fn current() -> Result<Self, PlatformError> {
        Self::from_target(std::env::consts::OS)
    }

    /// Map a Rust target OS name (`std::env::consts::OS`).
    pub fn from_target(os: &str) -> Result<Self, PlatformError> {
        match os {
            "macos" => Ok(Self::MacOs),
            "linux" => Ok(Self::Linux),
            "windows" => Ok(Self::Windows),
            other => Err(PlatformError::UnknownOs(other.to_string())),
        }
    }

    /// Identifier used in release asset names (`darwin`, `linux`, `windows`).
    pub fn asset_id(&self) -> &'static str {
        match self {
            Self::MacOs => "darwin",
            Self::Linux => "linux",
            Self::Windows => "windows",
        }
    }

    /// Homebrew formula block selecting this OS, if Homebrew has one.
    pub fn formula_block(&self) -> Option<&'static str> {
        match self {
            Self::MacOs => Some("on_macos"),
            Self::Linux => Some("on_linux"),
            Self::Windows => None,
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.asset_id())
    }
}

impl FromStr for OsFamily {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "darwin" | "macos" | "osx" => Ok(Self::MacOs),
            "linux" => Ok(Self::Linux),
            "windows" | "win" => Ok(Self::Windows),
            _ => Err(PlatformError::UnknownOs(s.to_string())),
        }
    }
}

/// CPU architecture of a release artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Arch {
    #[serde(rename = "arm64", alias = "aarch64")]
    Arm64,
    #[serde(rename = "amd64", alias = "x86_64")]
    Amd64,
    #[serde(rename = "386", alias = "x86")]
    X86,
}

impl Arch {
    /// The architecture the binary was compiled for, if it is one we can name.
    pub fn current() -> Result<Self, PlatformError> {
        Self::from_target(std::env::consts::ARCH)
    }

    /// Map a Rust target architecture name (`std::env::consts::ARCH`).
    pub fn from_target(arch: &str) -> Result<Self, PlatformError> {
        match arch {
            "aarch64" => Ok(Self::Arm64),
            "x86_64" => Ok(Self::Amd64),
            "x86" => Ok(Self::X86),
            other => Err(PlatformError::UnknownArch(other.to_string())),
        }
    }

    /// Identifier used in release asset names (`arm64`, `amd64`, `386`).
    pub fn asset_id(&self) -> &'static str {
        match self {
            Self::Arm64 => "arm64",
            Self::Amd64 => "amd64",
            Self::X86 => "386",
        }
    }

    /// Homebrew formula block selecting this architecture.
    pub fn formula_block(&self) -> Option<&'static str> {
        match self {
            Self::Arm64 => Some("on_arm"),
            Self::Amd64 => Some("on_intel"),
            Self::X86 => None,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.asset_id())
    }
}

impl FromStr for Arch {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "arm64" | "aarch64" | "arm" => Ok(Self::Arm64),
            "amd64" | "x86_64" | "x64" | "intel" => Ok(Self::Amd64),
            "386" | "x86" | "i386" | "i686" => Ok(Self::X86),
            _ => Err(PlatformError::UnknownArch(s.to_string())),
        }
    }
}

/// The (OS family, architecture) pair identifying which artifact a machine needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlatformKey {
    pub os: OsFamily,
    pub arch: Arch,
}

impl PlatformKey {
    /// Platforms the release pipeline publishes archives for.
    pub const SUPPORTED: [PlatformKey; 4] = [
        PlatformKey::new(OsFamily::MacOs, Arch::Arm64),
        PlatformKey::new(OsFamily::MacOs, Arch::Amd64),
        PlatformKey::new(OsFamily::Linux, Arch::Arm64),
        PlatformKey::new(OsFamily::Linux, Arch::Amd64),
    ];

    pub const fn new(os: OsFamily, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Detect the current platform
    pub fn detect() -> Result<Self, PlatformError> {
        Ok(Self::new(OsFamily::current()?, Arch::current()?))
    }

    pub fn is_supported(&self) -> bool {
        Self::SUPPORTED.contains(self)
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

impl FromStr for PlatformKey {
    type Err = PlatformError;

    /// Accepts `linux-amd64`, `darwin/arm64` and the aliases of [`OsFamily`] and [`Arch`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (os, arch) = s
            .split_once(['-', '/'])
            .ok_or_else(|| PlatformError::Malformed(s.to_string()))?;
        if os.is_empty() || arch.is_empty() {
            return Err(PlatformError::Malformed(s.to_string()));
        }
        Ok(Self::new(os.parse()?, arch.parse()?))
    }
}
