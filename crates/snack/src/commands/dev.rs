//! Development server command.

use std::path::Path;

use anyhow::Result;
use snack_server::{DevServer, DevServerConfig};

use crate::config::build_config;

/// Run the dev server.
pub async fn run(config_path: &Path, port: u16, open: bool) -> Result<()> {
    tracing::info!("Starting development server on port {}", port);

    let config = DevServerConfig {
        build: build_config(config_path, None, Some(false))?,
        port,
        open,
        ..Default::default()
    };

    DevServer::new(config).start().await?;

    Ok(())
}
