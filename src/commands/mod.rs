//! CLI command implementations.
//!
//! Each command loads the manifest through [`Config`], works on the release
//! table, and prints its result to stdout.

pub mod config;
mod formula;
mod list;
mod paths;
mod publish;
mod resolve;
mod show;

pub use config::Config;
pub use formula::formula;
pub use list::list;
pub use paths::default_manifest_path;
pub use publish::publish;
pub use resolve::{Resolution, resolve};
pub use show::show;
