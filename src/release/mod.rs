//! Release metadata and artifact resolution.
//!
//! A [`ReleaseTable`] is the append-only list of published releases. Each
//! [`ReleaseDescriptor`] maps the platforms it was built for to the archive
//! URL and SHA-256 digest a package manager should fetch and verify.

mod artifact;
mod descriptor;
mod error;
mod table;
mod version;

pub use artifact::{ArtifactRef, Sha256};
pub use descriptor::ReleaseDescriptor;
pub use error::{ArtifactError, ResolveError, TableError};
pub use table::ReleaseTable;
pub use version::{VersionConstraint, versions_match};
