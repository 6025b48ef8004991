use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::platform::PlatformKey;

/// Download location of the multi-platform archives.
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://github.com/masahide/gopssh/releases/download/{{version}}/{{os}}-{{arch}}.tar.gz";

const TEMPLATE_NAME: &str = "url";

/// Handlebars template producing an artifact URL from `version`, `os` and `arch`.
///
/// `os` and `arch` are the asset identifiers (`darwin`, `linux`, `arm64`, `amd64`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UrlTemplate(String);

#[derive(Serialize)]
struct UrlParams<'a> {
    version: &'a str,
    os: &'a str,
    arch: &'a str,
}

impl UrlTemplate {
    pub fn new(source: impl Into<String>) -> Result<Self, handlebars::TemplateError> {
        let source = source.into();
        Self::registry(&source)?;
        Ok(Self(source))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the URL of `platform`'s archive for `version`.
    pub fn render(&self, version: &str, platform: PlatformKey) -> anyhow::Result<String> {
        let registry = Self::registry(&self.0)?;
        let url = registry.render(
            TEMPLATE_NAME,
            &UrlParams {
                version,
                os: platform.os.asset_id(),
                arch: platform.arch.asset_id(),
            },
        )?;
        Ok(url)
    }

    fn registry(source: &str) -> Result<Handlebars<'static>, handlebars::TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_template_string(TEMPLATE_NAME, source)?;
        Ok(registry)
    }
}

impl Default for UrlTemplate {
    fn default() -> Self {
        Self(DEFAULT_URL_TEMPLATE.to_string())
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UrlTemplate {
    type Error = handlebars::TemplateError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<UrlTemplate> for String {
    fn from(t: UrlTemplate) -> Self {
        t.0
    }
}
