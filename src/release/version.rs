//! Version selection for releases.

use std::str::FromStr;

/// Version constraint for selecting a release.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionConstraint {
    /// Match exact version (e.g., "1.2.3" or "v1.2.3")
    Exact(String),
    /// Most recently published release
    #[default]
    Latest,
}

impl FromStr for VersionConstraint {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("latest") {
            Ok(Self::Latest)
        } else {
            Ok(Self::Exact(s.to_string()))
        }
    }
}

/// Check if two version strings match.
///
/// Handles the 'v' prefix flexibly (e.g., "v1.0.0" matches "1.0.0").
pub fn versions_match(v1: &str, v2: &str) -> bool {
    let n1 = v1.strip_prefix('v').unwrap_or(v1);
    let n2 = v2.strip_prefix('v').unwrap_or(v2);
    !n1.is_empty() && n1 == n2
}
