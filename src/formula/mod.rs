//! Homebrew formula generation.
//!
//! Renders the Ruby formula a tap publishes for one release, from the static
//! formula metadata and the release's artifact table.

mod url;

use anyhow::{Context, Result};
use handlebars::Handlebars;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::platform::OsFamily;
use crate::release::ReleaseDescriptor;

pub use url::{DEFAULT_URL_TEMPLATE, UrlTemplate};

/// Static formula metadata shared by every release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaInfo {
    pub name: String,
    pub desc: String,
    pub homepage: String,
    #[serde(default)]
    pub license: Option<String>,
    /// Executable inside the archive, installed into the bin directory.
    pub binary: String,
    /// Arguments of the post-install smoke test.
    #[serde(default)]
    pub test_args: Vec<String>,
}

impl Default for FormulaInfo {
    fn default() -> Self {
        Self {
            name: "gopssh".into(),
            desc: "parallel ssh client".into(),
            homepage: "https://github.com/masahide/gopssh".into(),
            license: Some("MIT".into()),
            binary: "gopssh".into(),
            test_args: vec!["-v".into()],
        }
    }
}

impl FormulaInfo {
    /// Ruby class name Homebrew derives from the formula name.
    pub fn class_name(&self) -> String {
        self.name
            .replace('@', "AT")
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect()
    }
}

const FORMULA_TEMPLATE: &str = r##"class {{class_name}} < Formula
  desc "{{desc}}"
  homepage "{{homepage}}"
{{#if license}}
  license "{{license}}"
{{/if}}
  version "{{version}}"
{{#if single}}
  url "{{single.url}}"
  sha256 "{{single.sha256}}"
{{else}}
{{#each os_blocks}}
  {{block}} do
{{#each arches}}
    {{block}} do
      url "{{url}}"
      sha256 "{{sha256}}"
    end
{{/each}}
  end
{{/each}}
{{/if}}

  def install
    system "chmod", "755", "{{binary}}"
    bin.install "{{binary}}"
  end

  test do
    system "#{bin}/{{binary}}"{{#each test_args}}, "{{this}}"{{/each}}
  end
end
"##;

#[derive(Serialize)]
struct FormulaParams<'a> {
    class_name: String,
    desc: &'a str,
    homepage: &'a str,
    license: Option<&'a str>,
    version: &'a str,
    single: Option<ArtifactParams<'a>>,
    os_blocks: Vec<OsBlock<'a>>,
    binary: &'a str,
    test_args: &'a [String],
}

#[derive(Serialize)]
struct OsBlock<'a> {
    block: &'static str,
    arches: Vec<ArtifactParams<'a>>,
}

#[derive(Serialize)]
struct ArtifactParams<'a> {
    block: &'static str,
    url: &'a str,
    sha256: &'a str,
}

/// Render the Homebrew formula installing `release`.
///
/// A release with a single macOS artifact renders the flat `url`/`sha256`
/// form of the early formulas; anything else renders `on_macos`/`on_linux`
/// blocks nested with `on_arm`/`on_intel`. Platforms Homebrew cannot select
/// are left out.
#[tracing::instrument(skip(info, release), fields(version = release.version()))]
pub fn render_formula(info: &FormulaInfo, release: &ReleaseDescriptor) -> Result<String> {
    let class_name = info.class_name();
    if !class_name.starts_with(|c: char| c.is_ascii_uppercase()) {
        anyhow::bail!(
            "Formula name '{}' does not give a Ruby class name; it must start with a letter",
            info.name
        );
    }

    let mut single = None;
    let mut os_blocks: Vec<OsBlock> = Vec::new();

    let entries: Vec<_> = release.entries().collect();
    if let [(platform, artifact)] = entries.as_slice()
        && platform.os == OsFamily::MacOs
    {
        single = Some(ArtifactParams {
            block: "",
            url: &artifact.url,
            sha256: artifact.checksum.as_str(),
        });
    } else {
        for (platform, artifact) in entries {
            let (Some(os_block), Some(arch_block)) =
                (platform.os.formula_block(), platform.arch.formula_block())
            else {
                warn!(
                    "Release {} has an artifact for {}, which a formula cannot select; skipping",
                    release.version(),
                    platform
                );
                continue;
            };

            let params = ArtifactParams {
                block: arch_block,
                url: &artifact.url,
                sha256: artifact.checksum.as_str(),
            };
            // Entries arrive grouped by OS
            match os_blocks.last_mut() {
                Some(last) if last.block == os_block => last.arches.push(params),
                _ => os_blocks.push(OsBlock {
                    block: os_block,
                    arches: vec![params],
                }),
            }
        }

        if os_blocks.is_empty() {
            anyhow::bail!(
                "Release {} has no artifact for a platform Homebrew supports",
                release.version()
            );
        }
    }

    let params = FormulaParams {
        class_name,
        desc: &info.desc,
        homepage: &info.homepage,
        license: info.license.as_deref(),
        version: release.version(),
        single,
        os_blocks,
        binary: &info.binary,
        test_args: &info.test_args,
    };

    let mut registry = Handlebars::new();
    registry.register_escape_fn(escape_ruby);
    registry
        .register_template_string("formula", FORMULA_TEMPLATE)
        .context("Invalid formula template")?;
    registry
        .render("formula", &params)
        .with_context(|| format!("Failed to render formula for {}", release.version()))
}

/// Escape text for a double-quoted Ruby string literal.
fn escape_ruby(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '#' if chars.peek() == Some(&'{') => out.push_str("\\#"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Arch, PlatformKey};
    use crate::release::{ArtifactRef, Sha256};

    fn release(version: &str, platforms: &[PlatformKey]) -> ReleaseDescriptor {
        let template = UrlTemplate::default();
        let entries = platforms.iter().enumerate().map(|(i, p)| {
            let url = template.render(version, *p).unwrap();
            let digest = Sha256::new(&format!("{:x}", i + 10).repeat(64)[..64]).unwrap();
            (*p, ArtifactRef::new(url, digest).unwrap())
        });
        ReleaseDescriptor::new(version, entries).unwrap()
    }

    fn lines(s: &str) -> Vec<&str> {
        s.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect()
    }

    #[test]
    fn test_class_name() {
        let mut info = FormulaInfo::default();
        assert_eq!(info.class_name(), "Gopssh");

        info.name = "foo-bar_baz".into();
        assert_eq!(info.class_name(), "FooBarBaz");

        info.name = "node@18".into();
        assert_eq!(info.class_name(), "NodeAT18");
    }

    #[test]
    fn test_render_legacy_single_platform() {
        let url = "https://github.com/masahide/gopssh/releases/download/v0.1.0/gopssh_Darwin_x86_64.tar.gz";
        let digest = "8fb4796286ef3e9d1ed72458b44c9a06723d44be8aa99da6ac6e75b3ed063805";
        let r = ReleaseDescriptor::new(
            "0.1.0",
            [(
                PlatformKey::new(OsFamily::MacOs, Arch::Amd64),
                ArtifactRef::new(url, Sha256::new(digest).unwrap()).unwrap(),
            )],
        )
        .unwrap();

        let out = render_formula(&FormulaInfo::default(), &r).unwrap();
        let l = lines(&out);
        assert_eq!(l[0], "class Gopssh < Formula");
        assert!(l.contains(&r#"desc "parallel ssh client""#));
        assert!(l.contains(&r#"license "MIT""#));
        assert!(l.contains(&r#"version "0.1.0""#));
        assert!(l.contains(&format!(r#"url "{}""#, url).as_str()));
        assert!(l.contains(&format!(r#"sha256 "{}""#, digest).as_str()));
        assert!(!out.contains("on_macos"));
        assert!(l.contains(&r#"bin.install "gopssh""#));
        assert!(l.contains(&r##"system "#{bin}/gopssh", "-v""##));
        assert_eq!(l.last(), Some(&"end"));
    }

    #[test]
    fn test_render_multi_platform() {
        let r = release("1.0.0", &PlatformKey::SUPPORTED);
        let out = render_formula(&FormulaInfo::default(), &r).unwrap();
        let l = lines(&out);

        let macos = l.iter().position(|x| *x == "on_macos do").unwrap();
        let linux = l.iter().position(|x| *x == "on_linux do").unwrap();
        assert!(macos < linux);
        assert_eq!(l.iter().filter(|x| **x == "on_arm do").count(), 2);
        assert_eq!(l.iter().filter(|x| **x == "on_intel do").count(), 2);

        for p in PlatformKey::SUPPORTED {
            let a = r.get(&p).unwrap();
            assert!(l.contains(&format!(r#"url "{}""#, a.url).as_str()));
            assert!(l.contains(&format!(r#"sha256 "{}""#, a.checksum).as_str()));
        }

        // linux-amd64 sits inside on_linux/on_intel
        let linux_amd64 = l
            .iter()
            .position(|x| x.contains("/1.0.0/linux-amd64.tar.gz"))
            .unwrap();
        assert!(linux_amd64 > linux);
        assert_eq!(l[linux_amd64 - 1], "on_intel do");

        // Every block is closed
        let opened = l.iter().filter(|x| x.ends_with(" do")).count();
        let closed = l.iter().filter(|x| **x == "end").count();
        assert_eq!(closed, opened + 2); // class and def install
    }

    #[test]
    fn test_render_single_linux_artifact_keeps_guards() {
        let r = release("1.2.0", &[PlatformKey::new(OsFamily::Linux, Arch::Arm64)]);
        let out = render_formula(&FormulaInfo::default(), &r).unwrap();
        assert!(out.contains("on_linux do"));
        assert!(out.contains("on_arm do"));
        assert!(!out.contains("on_macos"));
    }

    #[test]
    fn test_render_skips_unselectable_platforms() {
        let r = release(
            "1.3.0",
            &[
                PlatformKey::new(OsFamily::Linux, Arch::Amd64),
                PlatformKey::new(OsFamily::Windows, Arch::Amd64),
            ],
        );
        let out = render_formula(&FormulaInfo::default(), &r).unwrap();
        assert!(!out.contains("windows"));
        assert!(out.contains("linux-amd64"));

        let only_windows = release("1.4.0", &[PlatformKey::new(OsFamily::Windows, Arch::Amd64)]);
        assert!(render_formula(&FormulaInfo::default(), &only_windows).is_err());
    }

    #[test]
    fn test_render_escapes_ruby_strings() {
        let info = FormulaInfo {
            desc: r#"a "quoted" #{evil} desc"#.into(),
            license: None,
            test_args: vec!["--version".into(), "-q".into()],
            ..FormulaInfo::default()
        };
        let r = release("1.0.0", &PlatformKey::SUPPORTED);
        let out = render_formula(&info, &r).unwrap();
        assert!(out.contains(r#"desc "a \"quoted\" \#{evil} desc""#));
        assert!(!out.contains("license"));
        assert!(out.contains(r##"system "#{bin}/gopssh", "--version", "-q""##));
    }

    #[test]
    fn test_render_rejects_names_without_a_class_name() {
        let r = release("1.0.0", &PlatformKey::SUPPORTED);
        for name in ["", "1x", "-"] {
            let info = FormulaInfo {
                name: name.into(),
                ..FormulaInfo::default()
            };
            let err = render_formula(&info, &r).unwrap_err();
            assert!(err.to_string().contains("Ruby class name"), "{name}: {err}");
        }
    }

    #[test]
    fn test_escape_ruby() {
        assert_eq!(escape_ruby(r"a\b"), r"a\\b");
        assert_eq!(escape_ruby("#tag"), "#tag");
        assert_eq!(escape_ruby("#{x}"), r"\#{x}");
    }
}
