use anyhow::Result;

use crate::{
    manifest::Manifest,
    platform::PlatformDetector,
    release::VersionConstraint,
    runtime::Runtime,
};

use super::config::Config;

/// Show every artifact of one release
#[tracing::instrument(skip(config))]
pub fn show<R: Runtime, D: PlatformDetector>(config: &Config<R, D>, version: &str) -> Result<()> {
    let manifest = config.load_manifest()?;
    print!("{}", describe(&manifest, version)?);
    Ok(())
}

pub(crate) fn describe(manifest: &Manifest, version: &str) -> Result<String> {
    let constraint: VersionConstraint = version.parse()?;
    let release = manifest.releases.select(&constraint)?;

    let mut out = format!("{} {}\n", manifest.formula.name, release.version());
    for (platform, artifact) in release.entries() {
        out.push_str(&format!("  {}\n", platform));
        out.push_str(&format!("    url: {}\n", artifact.url));
        out.push_str(&format!("    sha256: {}\n", artifact.checksum));
    }
    Ok(out)
}
