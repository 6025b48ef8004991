use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::{ArtifactRef, Sha256, TableError};
use crate::platform::{Arch, OsFamily, PlatformKey};

/// One published release: its version and the artifact for each platform.
///
/// Immutable once built. Platforms are unique, and no two platforms share a
/// download URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRelease", into = "RawRelease")]
pub struct ReleaseDescriptor {
    version: String,
    entries: BTreeMap<PlatformKey, ArtifactRef>,
}

impl ReleaseDescriptor {
    pub fn new<I>(version: impl Into<String>, entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (PlatformKey, ArtifactRef)>,
    {
        let version = version.into().trim().to_string();
        // Lookups ignore a leading 'v', so "v" alone names no version
        if version.strip_prefix('v').unwrap_or(&version).is_empty() {
            return Err(TableError::EmptyVersion);
        }

        let mut map = BTreeMap::new();
        let mut urls = HashSet::new();
        for (platform, artifact) in entries {
            if !urls.insert(artifact.url.clone()) {
                return Err(TableError::DuplicateUrl {
                    version,
                    url: artifact.url,
                });
            }
            if map.insert(platform, artifact).is_some() {
                return Err(TableError::DuplicatePlatform { version, platform });
            }
        }

        if map.is_empty() {
            return Err(TableError::EmptyRelease(version));
        }

        Ok(Self {
            version,
            entries: map,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn get(&self, platform: &PlatformKey) -> Option<&ArtifactRef> {
        self.entries.get(platform)
    }

    /// Entries ordered by OS family, then architecture.
    pub fn entries(&self) -> impl Iterator<Item = (&PlatformKey, &ArtifactRef)> {
        self.entries.iter()
    }

    pub fn platforms(&self) -> impl Iterator<Item = &PlatformKey> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Serialize, Deserialize)]
struct RawRelease {
    version: String,
    artifacts: Vec<RawEntry>,
}

#[derive(Serialize, Deserialize)]
struct RawEntry {
    os: OsFamily,
    arch: Arch,
    url: String,
    sha256: Sha256,
}

impl TryFrom<RawRelease> for ReleaseDescriptor {
    type Error = TableError;

    fn try_from(raw: RawRelease) -> Result<Self, Self::Error> {
        let entries = raw
            .artifacts
            .into_iter()
            .map(|e| {
                let artifact = ArtifactRef::new(e.url, e.sha256)?;
                Ok((PlatformKey::new(e.os, e.arch), artifact))
            })
            .collect::<Result<Vec<_>, TableError>>()?;
        ReleaseDescriptor::new(raw.version, entries)
    }
}

impl From<ReleaseDescriptor> for RawRelease {
    fn from(d: ReleaseDescriptor) -> Self {
        RawRelease {
            version: d.version,
            artifacts: d
                .entries
                .into_iter()
                .map(|(platform, artifact)| RawEntry {
                    os: platform.os,
                    arch: platform.arch,
                    url: artifact.url,
                    sha256: artifact.checksum,
                })
                .collect(),
        }
    }
}
