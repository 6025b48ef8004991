//! Per-user directories.

use std::env;
use std::path::PathBuf;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn home_dir_impl(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    /// `$XDG_CONFIG_HOME` when set to an absolute path, on every platform;
    /// otherwise the platform's config directory.
    #[tracing::instrument(skip(self))]
    pub(crate) fn config_dir_impl(&self) -> Option<PathBuf> {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .or_else(dirs::config_dir)
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};

    #[test]
    fn test_config_dir_is_absolute() {
        let runtime = RealRuntime;
        // Build sandboxes may have neither a home nor a config directory
        if let Some(config) = runtime.config_dir() {
            assert!(config.is_absolute());
        }
        if let Some(home) = runtime.home_dir() {
            assert!(home.is_absolute());
        }
    }
}
