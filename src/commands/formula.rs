use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use crate::{
    formula::render_formula,
    platform::PlatformDetector,
    release::VersionConstraint,
    runtime::Runtime,
};

use super::config::Config;

/// Render the Homebrew formula for a release to stdout or a file
#[tracing::instrument(skip(config))]
pub fn formula<R: Runtime, D: PlatformDetector>(
    config: &Config<R, D>,
    version: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let manifest = config.load_manifest()?;
    let constraint: VersionConstraint = version.parse()?;
    let release = manifest.releases.select(&constraint)?;
    let ruby = render_formula(&manifest.formula, release)?;

    match output {
        Some(path) => {
            config
                .runtime
                .write(&path, ruby.as_bytes())
                .with_context(|| format!("Failed to write formula to {:?}", path))?;
            info!("Wrote formula for {} to {:?}", release.version(), path);
        }
        None => print!("{}", ruby),
    }
    Ok(())
}
