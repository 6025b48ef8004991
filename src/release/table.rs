use log::debug;
use serde::{Deserialize, Serialize};

use super::{
    ArtifactRef, ReleaseDescriptor, ResolveError, Sha256, TableError, VersionConstraint,
    versions_match,
};
use crate::platform::{Arch, OsFamily, PlatformKey};

/// URL of the only release published before multi-platform builds existed.
const LEGACY_URL: &str =
    "https://github.com/masahide/gopssh/releases/download/v0.1.0/gopssh_Darwin_x86_64.tar.gz";
const LEGACY_SHA256: &str = "8fb4796286ef3e9d1ed72458b44c9a06723d44be8aa99da6ac6e75b3ed063805";

/// Append-only list of published releases, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<ReleaseDescriptor>", into = "Vec<ReleaseDescriptor>")]
pub struct ReleaseTable {
    releases: Vec<ReleaseDescriptor>,
}

impl ReleaseTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding the releases published before this tool managed them.
    pub fn builtin() -> Result<Self, TableError> {
        let artifact = ArtifactRef::new(LEGACY_URL, Sha256::new(LEGACY_SHA256)?)?;
        let legacy = ReleaseDescriptor::new(
            "0.1.0",
            [(PlatformKey::new(OsFamily::MacOs, Arch::Amd64), artifact)],
        )?;

        let mut table = Self::new();
        table.push(legacy)?;
        Ok(table)
    }

    /// Append a release. Published versions are never replaced.
    pub fn push(&mut self, descriptor: ReleaseDescriptor) -> Result<(), TableError> {
        if self.get(descriptor.version()).is_some() {
            return Err(TableError::DuplicateVersion(descriptor.version().to_string()));
        }
        debug!(
            "Appending release {} with {} artifact(s)",
            descriptor.version(),
            descriptor.len()
        );
        self.releases.push(descriptor);
        Ok(())
    }

    /// Find a release by version, ignoring a leading 'v' on either side.
    pub fn get(&self, version: &str) -> Option<&ReleaseDescriptor> {
        let version = version.trim();
        self.releases
            .iter()
            .find(|r| versions_match(r.version(), version))
    }

    /// The most recently published release.
    pub fn latest(&self) -> Option<&ReleaseDescriptor> {
        self.releases.last()
    }

    pub fn find(&self, constraint: &VersionConstraint) -> Option<&ReleaseDescriptor> {
        match constraint {
            VersionConstraint::Exact(version) => self.get(version),
            VersionConstraint::Latest => self.latest(),
        }
    }

    /// Select the release matching `constraint`.
    pub fn select(
        &self,
        constraint: &VersionConstraint,
    ) -> Result<&ReleaseDescriptor, ResolveError> {
        self.find(constraint)
            .ok_or_else(|| ResolveError::UnknownVersion {
                version: match constraint {
                    VersionConstraint::Exact(v) => v.clone(),
                    VersionConstraint::Latest => "latest".to_string(),
                },
            })
    }

    /// Resolve the artifact a machine of the given platform needs for `version`.
    pub fn resolve(
        &self,
        version: &str,
        os: OsFamily,
        arch: Arch,
    ) -> Result<ArtifactRef, ResolveError> {
        self.resolve_key(version, PlatformKey::new(os, arch))
    }

    pub fn resolve_key(
        &self,
        version: &str,
        platform: PlatformKey,
    ) -> Result<ArtifactRef, ResolveError> {
        let release = self.get(version).ok_or_else(|| ResolveError::UnknownVersion {
            version: version.to_string(),
        })?;
        Self::artifact_for(release, platform)
    }

    /// Look up `platform` in an already selected release.
    pub fn artifact_for(
        release: &ReleaseDescriptor,
        platform: PlatformKey,
    ) -> Result<ArtifactRef, ResolveError> {
        release
            .get(&platform)
            .cloned()
            .ok_or_else(|| ResolveError::UnsupportedPlatform {
                version: release.version().to_string(),
                platform,
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReleaseDescriptor> {
        self.releases.iter()
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

impl TryFrom<Vec<ReleaseDescriptor>> for ReleaseTable {
    type Error = TableError;

    fn try_from(releases: Vec<ReleaseDescriptor>) -> Result<Self, Self::Error> {
        let mut table = Self::new();
        for release in releases {
            table.push(release)?;
        }
        Ok(table)
    }
}

impl From<ReleaseTable> for Vec<ReleaseDescriptor> {
    fn from(table: ReleaseTable) -> Self {
        table.releases
    }
}
