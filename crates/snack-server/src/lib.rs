//! Development server with live reload for staticsnack sites.
//!
//! Serves the built site, watches content and template sources, rebuilds on
//! change and tells connected browsers to reload over a WebSocket.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{site_router, DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{HmrHub, HmrMessage};
