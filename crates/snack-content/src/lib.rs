//! Content loading for staticsnack sites.
//!
//! A site is described by a list of [`ContentDescriptor`]s, each pairing a JSON
//! resource with the [`ContentKind`] that knows how to apply it. The [`Loader`]
//! fetches every resource from a [`ContentSource`], decodes the typed payload
//! and hands it to the kind's handler together with the page nodes it owns.

pub mod descriptor;
pub mod dom;
pub mod error;
pub mod handlers;
pub mod loader;
pub mod payload;
pub mod source;

pub use descriptor::{check_unique_kinds, default_descriptors, ContentDescriptor, ContentKind};
pub use dom::{Container, Element, HeroNodes, Node, Page, SocialNodes, TextNode};
pub use error::ContentError;
pub use loader::{load_site_assets, AppliedResource, LoadFailure, LoadReport, Loader};
pub use payload::{HeroContent, Payload, SocialContent, SocialLink};
pub use source::{ContentSource, DirSource, MemorySource, SourceError};
