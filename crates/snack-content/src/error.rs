//! Errors raised while building descriptors or loading a single resource.

use crate::source::SourceError;

/// Errors that can occur for content descriptors and resources.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Unknown content handler: {0}")]
    UnknownHandler(String),

    #[error("Content kind {kind} is handled by both {first} and {second}")]
    DuplicateKind {
        kind: &'static str,
        first: String,
        second: String,
    },

    #[error("Invalid resource path: {0}")]
    InvalidPath(String),

    #[error("Failed to fetch {path}: {source}")]
    Fetch {
        path: String,
        #[source]
        source: SourceError,
    },

    #[error("Invalid JSON in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Unexpected {kind} payload shape: {message}")]
    Shape { kind: &'static str, message: String },
}
