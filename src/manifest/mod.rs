//! Release manifest storage.
//!
//! The manifest is the JSON document a tap keeps under version control: the
//! formula metadata, the URL template of multi-platform archives, and every
//! published release.

pub mod checksums;

use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::formula::{FormulaInfo, UrlTemplate};
use crate::platform::PlatformKey;
use crate::release::{ArtifactRef, ReleaseDescriptor, ReleaseTable, Sha256};
use crate::runtime::Runtime;

pub const MANIFEST_FILE: &str = "releases.json";

/// Formula metadata plus the append-only table of published releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub formula: FormulaInfo,
    #[serde(default)]
    pub url_template: UrlTemplate,
    #[serde(default)]
    pub releases: ReleaseTable,
}

impl Manifest {
    /// Manifest describing the releases published before this tool existed.
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            formula: FormulaInfo::default(),
            url_template: UrlTemplate::default(),
            releases: ReleaseTable::builtin()?,
        })
    }

    /// Load the manifest at `path`, or the built-in one if the file does not exist.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        if !runtime.exists(path) {
            info!(
                "No manifest at {}, using built-in release data",
                path.display()
            );
            return Self::builtin();
        }

        let content = runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read manifest {:?}", path))?;
        let manifest: Manifest = serde_json::from_str(&content)
            .with_context(|| format!("Invalid manifest {:?}", path))?;
        debug!(
            "Loaded {} release(s) from {:?}",
            manifest.releases.len(),
            path
        );
        Ok(manifest)
    }

    /// Save the manifest, replacing `path` only once the new content is fully written.
    #[tracing::instrument(skip(self, runtime))]
    pub fn save<R: Runtime>(&self, runtime: &R, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !runtime.exists(parent)
        {
            runtime.create_dir_all(parent)?;
        }

        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');

        let tmp = temp_path(path);
        runtime
            .write(&tmp, content.as_bytes())
            .with_context(|| format!("Failed to write manifest to {:?}", tmp))?;
        if let Err(e) = runtime.rename(&tmp, path) {
            let _ = runtime.remove_file(&tmp);
            return Err(e).with_context(|| format!("Failed to replace manifest {:?}", path));
        }
        Ok(())
    }

    /// Publish `version` with the given per-platform digests.
    ///
    /// URLs come from the manifest's URL template. Digests for platforms the
    /// release pipeline does not build are ignored.
    #[tracing::instrument(skip(self, checksums))]
    pub fn publish(
        &mut self,
        version: &str,
        checksums: &BTreeMap<PlatformKey, Sha256>,
    ) -> Result<ReleaseDescriptor> {
        let version = version.trim();
        let mut entries = Vec::new();
        for (platform, sha) in checksums {
            if !platform.is_supported() {
                warn!("Ignoring checksum for unsupported platform {}", platform);
                continue;
            }
            let url = self
                .url_template
                .render(version, *platform)
                .with_context(|| format!("Failed to render URL for {}", platform))?;
            entries.push((*platform, ArtifactRef::new(url, sha.clone())?));
        }

        if entries.is_empty() {
            bail!("No checksum for any supported platform; nothing to publish for {version}");
        }

        let descriptor = ReleaseDescriptor::new(version, entries)?;
        self.releases.push(descriptor.clone())?;
        info!(
            "Published {} for {} platform(s)",
            descriptor.version(),
            descriptor.len()
        );
        Ok(descriptor)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| MANIFEST_FILE.into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Arch, OsFamily};
    use crate::release::{ResolveError, TableError};
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;

    fn sha(c: char) -> Sha256 {
        Sha256::new(&c.to_string().repeat(64)).unwrap()
    }

    fn all_platforms() -> BTreeMap<PlatformKey, Sha256> {
        PlatformKey::SUPPORTED
            .iter()
            .zip(['a', 'b', 'c', 'd'])
            .map(|(p, c)| (*p, sha(c)))
            .collect()
    }

    #[test]
    fn test_builtin_manifest() {
        let m = Manifest::builtin().unwrap();
        assert_eq!(m.formula.name, "gopssh");
        assert_eq!(m.releases.len(), 1);
        assert_eq!(m.releases.latest().unwrap().version(), "0.1.0");
    }

    #[test_log::test]
    fn test_publish_renders_template_urls() {
        let mut m = Manifest::builtin().unwrap();
        let d = m.publish("1.0.0", &all_platforms()).unwrap();
        assert_eq!(d.len(), 4);

        let a = m
            .releases
            .resolve("1.0.0", OsFamily::Linux, Arch::Amd64)
            .unwrap();
        assert_eq!(
            a.url,
            "https://github.com/masahide/gopssh/releases/download/1.0.0/linux-amd64.tar.gz"
        );
        assert_eq!(a.checksum, sha('d'));
        assert_eq!(m.releases.latest().unwrap().version(), "1.0.0");
    }

    #[test_log::test]
    fn test_publish_partial_platforms() {
        let mut m = Manifest::builtin().unwrap();
        let mut sums = BTreeMap::new();
        sums.insert(PlatformKey::new(OsFamily::Linux, Arch::Arm64), sha('e'));
        sums.insert(PlatformKey::new(OsFamily::Windows, Arch::Amd64), sha('f'));

        let d = m.publish("1.1.0", &sums).unwrap();
        assert_eq!(d.len(), 1);
        assert_eq!(
            m.releases
                .resolve("1.1.0", OsFamily::MacOs, Arch::Arm64)
                .unwrap_err(),
            ResolveError::UnsupportedPlatform {
                version: "1.1.0".into(),
                platform: PlatformKey::new(OsFamily::MacOs, Arch::Arm64),
            }
        );
    }

    #[test]
    fn test_publish_requires_a_checksum() {
        let mut m = Manifest::builtin().unwrap();
        assert!(m.publish("1.0.0", &BTreeMap::new()).is_err());
        assert_eq!(m.releases.len(), 1);
    }

    #[test]
    fn test_publish_rejects_bare_v_version() {
        let mut m = Manifest::builtin().unwrap();
        for _ in 0..2 {
            let err = m.publish("v", &all_platforms()).unwrap_err();
            assert_eq!(
                err.downcast_ref::<TableError>(),
                Some(&TableError::EmptyVersion)
            );
        }
        assert_eq!(m.releases.len(), 1);
    }

    #[test]
    fn test_publish_never_replaces_a_release() {
        let mut m = Manifest::builtin().unwrap();
        m.publish("1.0.0", &all_platforms()).unwrap();

        let err = m.publish("1.0.0", &all_platforms()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TableError>(),
            Some(&TableError::DuplicateVersion("1.0.0".into()))
        );
    }

    #[test]
    fn test_load_missing_file_uses_builtin() {
        let mut runtime = MockRuntime::new();
        let path = PathBuf::from("/tap/releases.json");
        runtime
            .expect_exists()
            .with(eq(path.clone()))
            .returning(|_| false);

        let m = Manifest::load(&runtime, &path).unwrap();
        assert_eq!(m, Manifest::builtin().unwrap());
    }

    #[test]
    fn test_load_fills_defaults() {
        let mut runtime = MockRuntime::new();
        let path = PathBuf::from("/tap/releases.json");
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .with(eq(path.clone()))
            .returning(|_| Ok(r#"{"releases": []}"#.to_string()));

        let m = Manifest::load(&runtime, &path).unwrap();
        assert_eq!(m.formula, FormulaInfo::default());
        assert_eq!(m.url_template, UrlTemplate::default());
        assert!(m.releases.is_empty());
    }

    #[test]
    fn test_load_rejects_placeholder_checksums() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime.expect_read_to_string().returning(|_| {
            Ok(r#"{"releases": [{"version": "1.0.0", "artifacts": [
                {"os": "darwin", "arch": "arm64",
                 "url": "https://example.com/darwin-arm64.tar.gz",
                 "sha256": "__darwin-arm64_sha256__"}
            ]}]}"#
                .to_string())
        });

        let err = Manifest::load(&runtime, Path::new("/tap/releases.json")).unwrap_err();
        assert!(err.to_string().contains("Invalid manifest"));
    }

    #[test]
    fn test_save_writes_temp_then_renames() {
        let mut runtime = MockRuntime::new();
        let path = PathBuf::from("/tap/releases.json");
        let tmp = PathBuf::from("/tap/releases.json.tmp");

        runtime
            .expect_exists()
            .with(eq(PathBuf::from("/tap")))
            .returning(|_| true);
        runtime
            .expect_write()
            .withf(|p, contents| {
                p.ends_with("releases.json.tmp")
                    && std::str::from_utf8(contents)
                        .map(|s| s.contains("gopssh_Darwin_x86_64.tar.gz"))
                        .unwrap_or(false)
            })
            .returning(|_, _| Ok(()));
        runtime
            .expect_rename()
            .with(eq(tmp), eq(path.clone()))
            .returning(|_, _| Ok(()));

        Manifest::builtin().unwrap().save(&runtime, &path).unwrap();
    }

    #[test]
    fn test_save_cleans_up_when_rename_fails() {
        let mut runtime = MockRuntime::new();
        let path = PathBuf::from("/tap/releases.json");

        runtime.expect_exists().returning(|_| false);
        runtime
            .expect_create_dir_all()
            .with(eq(PathBuf::from("/tap")))
            .returning(|_| Ok(()));
        runtime.expect_write().returning(|_, _| Ok(()));
        runtime
            .expect_rename()
            .returning(|_, _| Err(anyhow::anyhow!("disk full")));
        runtime
            .expect_remove_file()
            .with(eq(PathBuf::from("/tap/releases.json.tmp")))
            .times(1)
            .returning(|_| Ok(()));

        assert!(Manifest::builtin().unwrap().save(&runtime, &path).is_err());
    }

    #[test_log::test]
    fn test_save_and_load_real_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tap").join(MANIFEST_FILE);
        let runtime = crate::runtime::RealRuntime;

        let mut m = Manifest::builtin().unwrap();
        m.publish("1.0.0", &all_platforms()).unwrap();
        m.save(&runtime, &path).unwrap();

        let loaded = Manifest::load(&runtime, &path).unwrap();
        assert_eq!(loaded, m);
        assert!(!dir.path().join("tap/releases.json.tmp").exists());
    }
}
