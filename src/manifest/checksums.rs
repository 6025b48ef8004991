//! Externally supplied archive digests.
//!
//! Release pipelines publish a `checksums.txt` next to the archives, one
//! `<sha256>  <file>` line per artifact. Only `.tar.gz` archives whose names
//! end in `<os>-<arch>` contribute; package files and the like are ignored.

use anyhow::{Context, Result, bail};
use log::debug;
use std::collections::BTreeMap;

use crate::platform::PlatformKey;
use crate::release::Sha256;

const ARCHIVE_SUFFIXES: [&str; 2] = [".tar.gz", ".tgz"];

/// Parse a checksums file into one digest per platform.
pub fn parse(text: &str) -> Result<BTreeMap<PlatformKey, Sha256>> {
    let mut checksums = BTreeMap::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(hex), Some(file), None) = (fields.next(), fields.next(), fields.next()) else {
            bail!("line {}: expected '<sha256>  <file>', got '{}'", line_no, line);
        };
        // sha256sum marks binary mode with a leading '*'
        let file = file.strip_prefix('*').unwrap_or(file);

        let sha = Sha256::new(hex).with_context(|| format!("line {}", line_no))?;

        let Some(platform) = platform_of(file) else {
            debug!("Skipping {}: not a platform archive", file);
            continue;
        };

        if checksums.insert(platform, sha).is_some() {
            bail!("line {}: second checksum for {}", line_no, platform);
        }
    }

    Ok(checksums)
}

/// Parse an `<os>-<arch>=<sha256>` command-line assignment.
pub fn parse_assignment(s: &str) -> Result<(PlatformKey, Sha256)> {
    let (platform, hex) = s
        .split_once('=')
        .with_context(|| format!("expected <os>-<arch>=<sha256>, got '{}'", s))?;
    let platform: PlatformKey = platform.trim().parse()?;
    let sha = Sha256::new(hex)?;
    Ok((platform, sha))
}

/// Platform named by an archive file, e.g. `gopssh_1.0.0_linux-amd64.tar.gz`.
fn platform_of(file: &str) -> Option<PlatformKey> {
    let name = file.rsplit('/').next().unwrap_or(file);
    let stem = ARCHIVE_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))?;

    let (head, arch) = stem.rsplit_once('-')?;
    let os = head.rsplit(['-', '_', '.']).next().unwrap_or(head);
    format!("{}-{}", os, arch).parse().ok()
}
