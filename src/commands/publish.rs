use anyhow::{Context, Result, bail};
use log::{debug, info};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::{
    manifest::checksums,
    platform::{PlatformDetector, PlatformKey},
    release::Sha256,
    runtime::Runtime,
};

use super::config::Config;

/// Append a release to the manifest from externally supplied checksums.
///
/// Digests come from a checksums file, from `<os>-<arch>=<sha256>`
/// assignments, or both; an assignment may not contradict the file.
#[tracing::instrument(skip(config))]
pub fn publish<R: Runtime, D: PlatformDetector>(
    config: &Config<R, D>,
    version: &str,
    checksums_file: Option<PathBuf>,
    assignments: &[String],
) -> Result<()> {
    let digests = collect_checksums(&config.runtime, checksums_file, assignments)?;

    let mut manifest = config.load_manifest()?;
    let release = manifest.publish(version, &digests)?;
    config.save_manifest(&manifest)?;

    info!("Saved manifest to {:?}", config.manifest_path);
    println!(
        "Published {} {} ({} platform(s))",
        manifest.formula.name,
        release.version(),
        release.len()
    );
    Ok(())
}

pub(crate) fn collect_checksums<R: Runtime>(
    runtime: &R,
    checksums_file: Option<PathBuf>,
    assignments: &[String],
) -> Result<BTreeMap<PlatformKey, Sha256>> {
    let mut digests = match checksums_file {
        Some(path) => {
            debug!("Reading checksums from {:?}", path);
            let text = runtime
                .read_to_string(&path)
                .with_context(|| format!("Failed to read checksums file {:?}", path))?;
            checksums::parse(&text)
                .with_context(|| format!("Invalid checksums file {:?}", path))?
        }
        None => BTreeMap::new(),
    };

    for assignment in assignments {
        let (platform, sha) = checksums::parse_assignment(assignment)?;
        match digests.get(&platform) {
            Some(existing) if existing != &sha => {
                bail!(
                    "Conflicting checksums for {}: {} and {}",
                    platform,
                    existing,
                    sha
                );
            }
            _ => {
                digests.insert(platform, sha);
            }
        }
    }

    Ok(digests)
}
