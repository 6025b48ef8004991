use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ArtifactError;

/// SHA-256 digest of a release archive (64 hex characters, lower case).
///
/// The digest is supplied when a release is published; nothing here hashes
/// bytes. Template placeholders like `__linux-amd64_sha256__` do not parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sha256(String);

impl Sha256 {
    pub fn new(s: &str) -> Result<Self, ArtifactError> {
        let hex = s.trim();
        let hex = hex.strip_prefix("sha256:").unwrap_or(hex);
        if hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(hex.to_ascii_lowercase()))
        } else {
            Err(ArtifactError::InvalidChecksum(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Sha256 {
    type Err = ArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Sha256 {
    type Error = ArtifactError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<Sha256> for String {
    fn from(h: Sha256) -> Self {
        h.0
    }
}

/// Where to fetch one platform's archive and the digest it must match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ArtifactRef {
    pub url: String,
    #[serde(rename = "sha256")]
    pub checksum: Sha256,
}

impl ArtifactRef {
    pub fn new(url: impl Into<String>, checksum: Sha256) -> Result<Self, ArtifactError> {
        let url = url.into();
        if !is_absolute_http_url(&url) {
            return Err(ArtifactError::InvalidUrl(url));
        }
        Ok(Self { url, checksum })
    }
}

fn is_absolute_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split('/').next().unwrap_or_default();
            !host.is_empty() && !url.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[derive(Deserialize)]
struct RawArtifactRef {
    url: String,
    sha256: Sha256,
}

impl<'de> Deserialize<'de> for ArtifactRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawArtifactRef::deserialize(deserializer)?;
        ArtifactRef::new(raw.url, raw.sha256).map_err(serde::de::Error::custom)
    }
}
