use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::{
    manifest::Manifest,
    platform::{DefaultPlatformDetector, PlatformDetector},
    runtime::Runtime,
};

use super::paths::default_manifest_path;

pub struct Config<R: Runtime, D: PlatformDetector> {
    pub runtime: R,
    pub detector: D,
    pub manifest_path: PathBuf,
}

impl<R: Runtime> Config<R, DefaultPlatformDetector> {
    pub fn new(runtime: R, manifest_path: Option<PathBuf>) -> Result<Self> {
        let manifest_path = match manifest_path {
            Some(path) => path,
            None => default_manifest_path(&runtime)?,
        };
        debug!("Using manifest: {:?}", manifest_path);

        Ok(Self {
            runtime,
            detector: DefaultPlatformDetector,
            manifest_path,
        })
    }
}

impl<R: Runtime, D: PlatformDetector> Config<R, D> {
    pub fn load_manifest(&self) -> Result<Manifest> {
        Manifest::load(&self.runtime, &self.manifest_path)
    }

    pub fn save_manifest(&self, manifest: &Manifest) -> Result<()> {
        manifest.save(&self.runtime, &self.manifest_path)
    }
}
