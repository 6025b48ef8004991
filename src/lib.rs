pub mod commands;
pub mod formula;
pub mod manifest;
pub mod platform;
pub mod release;
pub mod runtime;

pub use platform::{Arch, OsFamily, PlatformKey};
pub use release::{ArtifactRef, ReleaseDescriptor, ReleaseTable, ResolveError};
