use crate::platform::PlatformKey;

/// Invalid artifact data (bad URL or digest).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArtifactError {
    #[error("invalid sha256 '{0}': expected 64 hex characters")]
    InvalidChecksum(String),
    #[error("invalid artifact url '{0}': expected an absolute http(s) url")]
    InvalidUrl(String),
}

/// Violations of the release table invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("release version must not be empty")]
    EmptyVersion,
    #[error("release {0} has no artifacts")]
    EmptyRelease(String),
    #[error("release {0} is already published")]
    DuplicateVersion(String),
    #[error("release {version} lists {platform} more than once")]
    DuplicatePlatform { version: String, platform: PlatformKey },
    #[error("release {version} uses {url} for more than one platform")]
    DuplicateUrl { version: String, url: String },
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Failures of [`ReleaseTable::resolve`](super::ReleaseTable::resolve).
///
/// Both stem from missing static data, so retrying never helps.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no published release for version '{version}'")]
    UnknownVersion { version: String },
    #[error("release {version} has no artifact for {platform}")]
    UnsupportedPlatform { version: String, platform: PlatformKey },
}
