//! Preview server command.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use snack_server::site_router;

use crate::config::build_config;

/// Run the serve command.
///
/// Serves `dir` (or the configured output directory) under the configured base
/// URL, matching the links in the built pages.
pub async fn run(config_path: &Path, port: u16, dir: Option<PathBuf>) -> Result<()> {
    let config = build_config(config_path, dir, None)?;
    let dir = config.output_dir;

    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'snack build' first.",
            dir.display()
        );
    }

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    let url = format!("http://{}{}", addr, config.base_url);
    tracing::info!("Serving {} at {}", dir.display(), url);

    let app = site_router(&config.base_url, &dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let _ = open::that(&url);

    axum::serve(listener, app).await?;

    Ok(())
}
