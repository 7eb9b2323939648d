//! Site configuration file (snack.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use snack_content::{check_unique_kinds, default_descriptors, ContentDescriptor, ContentKind};
use snack_static::BuildConfig;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    site: SiteConfig,
    #[serde(default)]
    build: BuildSettings,
    /// Content descriptors; the defaults are used when empty
    #[serde(default)]
    content: Vec<ContentEntry>,
}

#[derive(Debug, Deserialize)]
struct SiteConfig {
    #[serde(default = "default_title")]
    title: String,
    #[serde(default = "default_base_url")]
    base_url: String,
    /// Absolute origin, e.g. "https://example.com"
    site_url: Option<String>,
    #[serde(default = "default_content_dir")]
    content_dir: String,
    #[serde(default = "default_public_dir")]
    public_dir: Option<String>,
    template_dir: Option<String>,
    #[serde(default = "default_output")]
    output: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            base_url: default_base_url(),
            site_url: None,
            content_dir: default_content_dir(),
            public_dir: default_public_dir(),
            template_dir: None,
            output: default_output(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BuildSettings {
    #[serde(default = "default_minify")]
    minify: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    path: String,
    handler: ContentKind,
}

fn default_title() -> String {
    "My Blog".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_content_dir() -> String {
    "content".to_string()
}
fn default_public_dir() -> Option<String> {
    Some("public".to_string())
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_minify() -> bool {
    true
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = parse_config(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    tracing::debug!("No config at {}, using defaults", path.display());
    Ok(ConfigFile::default())
}

fn parse_config(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(content)?)
}

impl ConfigFile {
    /// Resolve into a build config. Relative directories are taken relative to `root`.
    pub fn to_build_config(
        &self,
        root: &Path,
        output: Option<PathBuf>,
        minify: Option<bool>,
    ) -> Result<BuildConfig> {
        let descriptors = if self.content.is_empty() {
            default_descriptors()
        } else {
            let descriptors = self
                .content
                .iter()
                .map(|entry| ContentDescriptor::new(entry.path.clone(), entry.handler))
                .collect::<Result<Vec<_>, _>>()
                .context("Invalid [[content]] entry")?;
            check_unique_kinds(&descriptors).context("Invalid [[content]] entries")?;
            descriptors
        };

        Ok(BuildConfig {
            content_dir: root.join(&self.site.content_dir),
            public_dir: optional_dir(root, self.site.public_dir.as_deref()),
            template_dir: optional_dir(root, self.site.template_dir.as_deref()),
            output_dir: output.unwrap_or_else(|| root.join(&self.site.output)),
            minify: minify.unwrap_or(self.build.minify),
            base_url: normalize_base_url(&self.site.base_url),
            site_url: self
                .site
                .site_url
                .as_deref()
                .filter(|u| !u.is_empty())
                .map(str::to_string),
            title: self.site.title.clone(),
            descriptors,
            scripts: Vec::new(),
        })
    }
}

/// Load the config at `path` and resolve it into a build config.
pub fn build_config(
    path: &Path,
    output: Option<PathBuf>,
    minify: Option<bool>,
) -> Result<BuildConfig> {
    let root = path.parent().unwrap_or(Path::new(""));
    load_config(path)?.to_build_config(root, output, minify)
}

/// Resolve an optional directory; an empty string turns it off.
fn optional_dir(root: &Path, dir: Option<&str>) -> Option<PathBuf> {
    dir.filter(|d| !d.trim().is_empty()).map(|d| root.join(d))
}

/// Ensure the base URL starts and ends with a slash.
fn normalize_base_url(base: &str) -> String {
    let trimmed = base.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}
