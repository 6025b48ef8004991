use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use crate::manifest::MANIFEST_FILE;
use crate::runtime::Runtime;

/// Get the default manifest location: `<config_dir>/pssh-formula/releases.json`
#[tracing::instrument(skip(runtime))]
pub fn default_manifest_path<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    let config_dir = match runtime.config_dir() {
        Some(dir) => dir,
        None => {
            debug!("No platform config directory, falling back to ~/.config");
            runtime
                .home_dir()
                .context("Could not find home directory")?
                .join(".config")
        }
    };
    Ok(config_dir.join("pssh-formula").join(MANIFEST_FILE))
}
