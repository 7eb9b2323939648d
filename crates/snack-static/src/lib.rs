//! Static site builder for staticsnack sites.
//!
//! Loads the site's JSON content into the page model, renders `index.html`
//! and writes it together with its assets to the output directory.

pub mod assets;
pub mod builder;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
