use anyhow::Result;
use log::debug;

use crate::{manifest::Manifest, platform::PlatformDetector, runtime::Runtime};

use super::config::Config;

/// List published releases, oldest first
#[tracing::instrument(skip(config))]
pub fn list<R: Runtime, D: PlatformDetector>(config: &Config<R, D>) -> Result<()> {
    let manifest = config.load_manifest()?;
    debug!("Found {} release(s)", manifest.releases.len());

    let lines = release_lines(&manifest);
    if lines.is_empty() {
        println!("No releases published.");
        return Ok(());
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

pub(crate) fn release_lines(manifest: &Manifest) -> Vec<String> {
    manifest
        .releases
        .iter()
        .map(|release| {
            let platforms: Vec<String> = release.platforms().map(|p| p.to_string()).collect();
            format!("{} {}", release.version(), platforms.join(","))
        })
        .collect()
}
