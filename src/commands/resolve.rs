use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;

use crate::{
    manifest::Manifest,
    platform::{Arch, OsFamily, PlatformDetector, PlatformKey},
    release::{ReleaseTable, VersionConstraint},
    runtime::Runtime,
};

use super::config::Config;

/// The artifact chosen for one platform of one release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub version: String,
    pub platform: String,
    pub url: String,
    pub sha256: String,
}

/// Print the archive URL and digest a machine needs for `version`.
///
/// `os` and `arch` default to the detected platform.
#[tracing::instrument(skip(config))]
pub fn resolve<R: Runtime, D: PlatformDetector>(
    config: &Config<R, D>,
    version: &str,
    os: Option<OsFamily>,
    arch: Option<Arch>,
    json: bool,
) -> Result<()> {
    let platform = target_platform(&config.detector, os, arch)?;
    let manifest = config.load_manifest()?;
    let resolution = lookup(&manifest, version, platform)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
    } else {
        println!("version: {}", resolution.version);
        println!("platform: {}", resolution.platform);
        println!("url: {}", resolution.url);
        println!("sha256: {}", resolution.sha256);
    }
    Ok(())
}

/// Fill in whatever part of the platform the caller did not specify.
pub(crate) fn target_platform<D: PlatformDetector>(
    detector: &D,
    os: Option<OsFamily>,
    arch: Option<Arch>,
) -> Result<PlatformKey> {
    if let (Some(os), Some(arch)) = (os, arch) {
        return Ok(PlatformKey::new(os, arch));
    }

    let detected = detector
        .detect()
        .context("Could not detect the current platform; pass --os and --arch")?;
    debug!("Detected platform {}", detected);
    Ok(PlatformKey::new(
        os.unwrap_or(detected.os),
        arch.unwrap_or(detected.arch),
    ))
}

pub(crate) fn lookup(
    manifest: &Manifest,
    version: &str,
    platform: PlatformKey,
) -> Result<Resolution> {
    let constraint: VersionConstraint = version.parse()?;
    let release = manifest.releases.select(&constraint)?;
    let artifact = ReleaseTable::artifact_for(release, platform)?;

    Ok(Resolution {
        version: release.version().to_string(),
        platform: platform.to_string(),
        url: artifact.url,
        sha256: artifact.checksum.to_string(),
    })
}
