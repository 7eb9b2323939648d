//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use walkdir::WalkDir;

use snack_content::{default_descriptors, ContentDescriptor, DirSource, LoadReport, Loader, Page};

use crate::assets::AssetPipeline;
use crate::templates::{Context, TemplateEngine};

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory content resource paths are resolved against
    pub content_dir: PathBuf,

    /// Directory copied verbatim into the output root
    pub public_dir: Option<PathBuf>,

    /// Directory holding an `index.html` that replaces the built-in template
    pub template_dir: Option<PathBuf>,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// Base URL for the site
    pub base_url: String,

    /// Absolute origin the site is deployed at (e.g. "https://example.com"),
    /// needed for the sitemap
    pub site_url: Option<String>,

    /// Site title
    pub title: String,

    /// Content resources and the kinds that apply them
    pub descriptors: Vec<ContentDescriptor>,

    /// Extra script URLs appended to the page
    pub scripts: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            public_dir: Some(PathBuf::from("public")),
            template_dir: None,
            output_dir: PathBuf::from("dist"),
            minify: true,
            base_url: "/".to_string(),
            site_url: None,
            title: "My Blog".to_string(),
            descriptors: default_descriptors(),
            scripts: vec![],
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Content resources applied to the page
    pub applied: usize,

    /// Content resources that failed to load
    pub failed: usize,

    /// Files copied from the public directory
    pub public_files: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Invalid content configuration: {0}")]
    ContentError(#[from] snack_content::ContentError),

    #[error("Failed to read input: {0}")]
    ReadError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
///
/// A builder can run any number of builds; each one re-reads content and
/// templates from disk.
pub struct StaticBuilder {
    config: BuildConfig,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        if !self.config.content_dir.exists() {
            tracing::warn!(
                "Content directory not found: {}",
                self.config.content_dir.display()
            );
        }

        // Load every content resource into the page
        let source = DirSource::new(&self.config.content_dir);
        let loader = Loader::new(source.clone(), self.config.descriptors.clone())?;
        let mut page = Page::default();
        let report = loader
            .load_site_assets(&mut page, || tracing::debug!("All content resources settled"))
            .await;

        self.render_index(&page)?;

        self.generate_assets()?;

        self.copy_content(&source, &report)?;

        let public_files = self.copy_public()?;

        self.generate_sitemap()?;

        let duration = start.elapsed();

        Ok(BuildResult {
            applied: report.applied.len(),
            failed: report.failures.len(),
            public_files,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Pick the template source for this build.
    fn templates(&self) -> TemplateEngine {
        match self.config.template_dir {
            Some(ref dir) if dir.join("index.html").exists() => {
                tracing::debug!("Using page template from {}", dir.display());
                TemplateEngine::with_template_dir(dir)
            }
            Some(ref dir) => {
                tracing::warn!(
                    "No index.html in {}, using built-in template",
                    dir.display()
                );
                TemplateEngine::new()
            }
            None => TemplateEngine::new(),
        }
    }

    /// Render the page and write `index.html`.
    fn render_index(&self, page: &Page) -> Result<(), BuildError> {
        let mut context = Context::from_page(page, &self.config.title, &self.config.base_url);
        context.scripts = self.config.scripts.clone();

        let html = self
            .templates()
            .render_page(&context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        fs::write(self.config.output_dir.join("index.html"), html)
            .map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Failed to minify CSS: {}", e);
                css
            })
        } else {
            css
        };
        fs::write(assets_dir.join("main.css"), css)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Copy the applied content resources to `<output>/content/`.
    fn copy_content(&self, source: &DirSource, report: &LoadReport) -> Result<(), BuildError> {
        let content_out = self.config.output_dir.join("content");

        for applied in &report.applied {
            let from = source
                .resolve(&applied.resource_path)
                .map_err(|e| BuildError::ReadError(e.to_string()))?;
            let to = content_out.join(&applied.resource_path);
            copy_file(&from, &to)?;
        }

        Ok(())
    }

    /// Copy the public directory into the output root.
    fn copy_public(&self) -> Result<usize, BuildError> {
        let Some(public_dir) = self.config.public_dir.as_deref() else {
            return Ok(0);
        };

        if !public_dir.exists() {
            tracing::debug!("Public directory not found: {}", public_dir.display());
            return Ok(0);
        }

        let files: Vec<PathBuf> = WalkDir::new(public_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect();

        files
            .par_iter()
            .map(|path| {
                let relative = path.strip_prefix(public_dir).unwrap_or(path);
                copy_file(path, &self.config.output_dir.join(relative))
            })
            .collect::<Result<Vec<()>, BuildError>>()?;

        tracing::info!(
            "Copied {} public files from {}",
            files.len(),
            public_dir.display()
        );

        Ok(files.len())
    }

    /// Absolute URL of the site root, if a site URL is configured.
    fn absolute_root(&self) -> Option<String> {
        self.config
            .site_url
            .as_deref()
            .map(|url| format!("{}{}", url.trim_end_matches('/'), self.config.base_url))
    }

    /// Generate robots.txt, plus sitemap.xml when the site URL is known.
    ///
    /// Sitemap locations must be absolute, so without a site URL no sitemap
    /// is written and robots.txt does not reference one.
    fn generate_sitemap(&self) -> Result<(), BuildError> {
        let mut robots = "User-agent: *\nAllow: /\n".to_string();

        if let Some(root) = self.absolute_root() {
            let sitemap = format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>{}</loc>
  </url>
</urlset>"#,
                root
            );

            fs::write(self.config.output_dir.join("sitemap.xml"), sitemap)
                .map_err(|e| BuildError::WriteError(e.to_string()))?;

            robots.push_str(&format!("Sitemap: {}sitemap.xml\n", root));
        } else {
            tracing::debug!("No site_url configured, skipping sitemap.xml");
        }

        fs::write(self.config.output_dir.join("robots.txt"), robots)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}

/// Copy a single file, creating parent directories as needed.
fn copy_file(from: &Path, to: &Path) -> Result<(), BuildError> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| BuildError::WriteError(format!("{}: {}", to.display(), e)))
}
