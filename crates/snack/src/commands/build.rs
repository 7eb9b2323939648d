//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use snack_static::StaticBuilder;

use crate::config::build_config;

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building static site...");

    let config = build_config(config_path, output, minify)?;

    let result = StaticBuilder::new(config).build().await?;

    if result.failed > 0 {
        tracing::warn!(
            "{} content resources failed to load, see warnings above",
            result.failed
        );
    }

    tracing::info!(
        "Applied {} content resources and copied {} public files in {}ms",
        result.applied,
        result.public_files,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
