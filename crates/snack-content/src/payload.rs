//! Typed payloads for each content kind.
//!
//! Every field is optional: handlers skip whatever is missing instead of
//! failing. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

use crate::dom::Page;
use crate::handlers;

/// Payload for `hero` content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HeroContent {
    /// Hero heading text
    #[serde(default)]
    pub title: Option<String>,

    /// Hero subheading text
    #[serde(default)]
    pub subtitle: Option<String>,
}

/// Payload for `social` content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SocialContent {
    /// Links in display order
    #[serde(default)]
    pub links: Option<Vec<SocialLink>>,
}

/// A single social profile link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SocialLink {
    /// Profile URL
    #[serde(default)]
    pub url: Option<String>,

    /// Platform name, used as the accessible label
    #[serde(default)]
    pub platform: Option<String>,

    /// Icon class list (e.g. "fab fa-github")
    #[serde(default)]
    pub icon: Option<String>,
}

/// A decoded payload, tagged by the kind that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Hero(Option<HeroContent>),
    Social(Option<SocialContent>),
}

impl Payload {
    /// Apply the payload to the page through its kind's handler.
    pub fn apply(&self, page: &mut Page) {
        match self {
            Payload::Hero(data) => handlers::hero::handle(data.as_ref(), page.hero_nodes()),
            Payload::Social(data) => handlers::social::handle(data.as_ref(), page.social_nodes()),
        }
    }
}
