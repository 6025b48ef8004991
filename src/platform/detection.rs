use super::{PlatformError, PlatformKey};

/// Trait for platform detection (useful for testing)
#[cfg_attr(test, mockall::automock)]
pub trait PlatformDetector: Send + Sync {
    fn detect(&self) -> Result<PlatformKey, PlatformError>;
}

/// Default platform detector using compile-time detection
pub struct DefaultPlatformDetector;

impl PlatformDetector for DefaultPlatformDetector {
    #[tracing::instrument(skip(self))]
    fn detect(&self) -> Result<PlatformKey, PlatformError> {
        PlatformKey::detect()
    }
}
