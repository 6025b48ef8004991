//! Platform identification module
//!
//! This module provides the (OS family, CPU architecture) pair that keys every
//! published artifact, plus detection of the platform the tool runs on.

mod detection;
mod key;

pub use detection::{DefaultPlatformDetector, PlatformDetector};
#[cfg(test)]
pub use detection::MockPlatformDetector;
pub use key::{Arch, OsFamily, PlatformKey};

/// Errors raised while naming or probing a platform.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("unknown operating system: {0}")]
    UnknownOs(String),
    #[error("unknown CPU architecture: {0}")]
    UnknownArch(String),
    #[error("invalid platform '{0}', expected <os>-<arch> (e.g. linux-amd64)")]
    Malformed(String),
}
