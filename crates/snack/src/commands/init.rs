//! Scaffold a new site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing staticsnack site...");

    let root = config_path.parent().unwrap_or(Path::new(""));
    scaffold(root, config_path, yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'snack dev' to start the development server.");

    Ok(())
}

/// Write the starter files, keeping existing ones unless `overwrite` is set.
fn scaffold(root: &Path, config_path: &Path, overwrite: bool) -> Result<()> {
    let content_dir = root.join("content");
    fs::create_dir_all(&content_dir).context("Failed to create content directory")?;
    fs::create_dir_all(root.join("public")).context("Failed to create public directory")?;

    write_starter(config_path, DEFAULT_CONFIG, overwrite)?;
    write_starter(&content_dir.join("hero.json"), DEFAULT_HERO, overwrite)?;
    write_starter(&content_dir.join("social.json"), DEFAULT_SOCIAL, overwrite)?;

    Ok(())
}

fn write_starter(path: &Path, contents: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
        return Ok(());
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());
    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# staticsnack configuration

[site]
# Site title
title = "My Blog"

# Base URL (for deployment under a sub-path)
base_url = "/"

# Absolute origin of the deployed site, used for sitemap.xml
# site_url = "https://example.com"

# Directory holding the JSON content files
content_dir = "content"

# Files copied verbatim into the output ("" to disable)
public_dir = "public"

# Optional directory with an index.html overriding the built-in page
# template_dir = "src"

# Output directory for the built site
output = "dist"

[build]
# Enable minification
minify = true

[[content]]
path = "hero.json"
handler = "hero"

[[content]]
path = "social.json"
handler = "social"
"#;

const DEFAULT_HERO: &str = r#"{
  "title": "Welcome to my blog",
  "subtitle": "Thoughts, notes and snacks"
}
"#;

const DEFAULT_SOCIAL: &str = r#"{
  "links": [
    {
      "url": "https://github.com/",
      "platform": "GitHub",
      "icon": "fab fa-github"
    },
    {
      "url": "https://x.com/",
      "platform": "X",
      "icon": "fab fa-x-twitter"
    }
  ]
}
"#;
