//! Development server implementation.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

use snack_static::{BuildConfig, StaticBuilder};

use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{hmr_client_script, HmrHub, HmrMessage};

const HMR_PATH: &str = "/__hmr";
const HMR_SCRIPT_PATH: &str = "/__hmr.js";

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Site build settings
    pub build: BuildConfig,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

impl DevServerConfig {
    /// Source directories that trigger a rebuild when they change.
    pub fn watch_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.build.content_dir.clone()];
        paths.extend(self.build.public_dir.clone());
        paths.extend(self.build.template_dir.clone());
        paths
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error("Build error: {0}")]
    BuildError(#[from] snack_static::BuildError),
}

/// Shared server state.
struct ServerState {
    builder: StaticBuilder,
    hmr: HmrHub,
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Build the site, then serve it and rebuild on every source change.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let mut build = self.config.build.clone();
        build.scripts.push(HMR_SCRIPT_PATH.to_string());
        let output_dir = build.output_dir.clone();
        let base_url = build.base_url.clone();

        let state = Arc::new(ServerState {
            builder: StaticBuilder::new(build),
            hmr: HmrHub::new(),
        });

        let result = state.builder.build().await?;
        tracing::info!(
            "Built site with {} content resources ({} failed) in {}ms",
            result.applied,
            result.failed,
            result.duration_ms
        );

        let (watcher, mut rx) = FileWatcher::new(&self.config.watch_paths())
            .map_err(|e| ServerError::WatchError(e.to_string()))?;

        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                // Fold everything already queued into one rebuild
                let mut events = vec![event];
                while let Ok(more) = rx.try_recv() {
                    events.push(more);
                }
                handle_watch_events(&state_clone, events).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = router(state, &base_url, &output_dir);

        tracing::info!("Starting dev server at http://{}{}", addr, base_url);

        if self.config.open {
            let url = format!("http://{}{}", addr, base_url);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Serve a built site from `dir`, mounted under its base URL.
///
/// Pages link their assets as `{base_url}assets/...`, so the site must be
/// served under the same prefix it was built for.
pub fn site_router(base_url: &str, dir: &Path) -> Router {
    let site = ServeDir::new(dir);

    match base_url.trim_end_matches('/') {
        "" => Router::new().fallback_service(site),
        prefix => Router::new().nest_service(prefix, site),
    }
}

/// Build the dev router: reload endpoints plus the site.
fn router(state: Arc<ServerState>, base_url: &str, dir: &Path) -> Router {
    Router::new()
        .route(HMR_PATH, get(ws_handler))
        .route(HMR_SCRIPT_PATH, get(hmr_script_handler))
        .with_state(state)
        .merge(site_router(base_url, dir))
}

/// Rebuild the site once for a batch of changes and notify clients.
async fn handle_watch_events(state: &ServerState, events: Vec<WatchEvent>) {
    for event in &events {
        match event {
            WatchEvent::ContentModified(path) => {
                tracing::info!("Content modified: {}", path.display())
            }
            WatchEvent::TemplateModified(path) => {
                tracing::info!("Template modified: {}", path.display())
            }
            other => tracing::debug!("File changed: {}", other.path().display()),
        }
    }

    match state.builder.build().await {
        Ok(result) => {
            tracing::info!("Rebuilt in {}ms", result.duration_ms);
            state.hmr.send(HmrMessage::Reload);
        }
        Err(e) => {
            tracing::warn!("Rebuild failed: {}", e);
            state.hmr.send(HmrMessage::BuildFailed {
                message: e.to_string(),
            });
        }
    }
}

/// Handler for the live reload WebSocket endpoint.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: Arc<ServerState>) {
    let mut rx = state.hmr.subscribe();

    if send_message(&mut socket, &HmrMessage::Connected).await.is_err() {
        return;
    }

    while let Ok(msg) = rx.recv().await {
        if send_message(&mut socket, &msg).await.is_err() {
            break;
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &HmrMessage) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}

/// Handler for the live reload client script.
async fn hmr_script_handler() -> impl IntoResponse {
    let script = hmr_client_script(HMR_PATH);
    ([("content-type", "application/javascript")], script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_server_with_default_config() {
        let server = DevServer::new(DevServerConfig::default());
        assert_eq!(server.config.port, 7777);
    }

    #[test]
    fn watches_content_public_and_templates() {
        let config = DevServerConfig {
            build: BuildConfig {
                template_dir: Some(PathBuf::from("src")),
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(
            config.watch_paths(),
            vec![
                PathBuf::from("content"),
                PathBuf::from("public"),
                PathBuf::from("src")
            ]
        );
    }

    #[tokio::test]
    async fn rebuild_broadcasts_reload() {
        let temp = tempdir().unwrap();
        let build = BuildConfig {
            content_dir: temp.path().join("content"),
            public_dir: None,
            output_dir: temp.path().join("dist"),
            ..Default::default()
        };
        let state = ServerState {
            builder: StaticBuilder::new(build),
            hmr: HmrHub::new(),
        };
        let mut rx = state.hmr.subscribe();

        handle_watch_events(
            &state,
            vec![
                WatchEvent::Created(temp.path().join("content/.hero.json.swp")),
                WatchEvent::ContentModified(temp.path().join("content/hero.json")),
            ],
        )
        .await;

        assert_eq!(rx.try_recv().unwrap(), HmrMessage::Reload);
        assert!(rx.try_recv().is_err(), "one rebuild per batch");
        assert!(temp.path().join("dist/index.html").exists());
    }

    /// Issue a GET over a raw connection and return the status line.
    async fn get_status(addr: SocketAddr, path: &str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
            path, addr
        );
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response.lines().next().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn site_router_serves_under_base_url() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        std::fs::create_dir_all(out.join("assets")).unwrap();
        std::fs::write(out.join("index.html"), "<h1>home</h1>").unwrap();
        std::fs::write(out.join("assets/main.css"), "body{}").unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = site_router("/staticsnack-template-blog/", &out);
        tokio::spawn(async move { axum::serve(listener, app).await });

        let css = get_status(addr, "/staticsnack-template-blog/assets/main.css").await;
        assert!(css.contains("200"), "unexpected status: {}", css);

        let index = get_status(addr, "/staticsnack-template-blog/").await;
        assert!(index.contains("200"), "unexpected status: {}", index);

        let outside = get_status(addr, "/assets/main.css").await;
        assert!(outside.contains("404"), "unexpected status: {}", outside);
    }

    #[tokio::test]
    async fn site_router_serves_root_base_url() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("index.html"), "<h1>home</h1>").unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = site_router("/", temp.path());
        tokio::spawn(async move { axum::serve(listener, app).await });

        let index = get_status(addr, "/").await;
        assert!(index.contains("200"), "unexpected status: {}", index);
    }

    #[tokio::test]
    async fn rejects_invalid_address() {
        let server = DevServer::new(DevServerConfig {
            host: "not an address".to_string(),
            open: false,
            ..Default::default()
        });

        assert!(matches!(
            server.start().await,
            Err(ServerError::InvalidAddress(_))
        ));
    }
}
