//! Hero section handler: overwrites the title and subtitle text.

use crate::dom::HeroNodes;
use crate::payload::HeroContent;

/// Apply hero content. Empty strings count as missing.
pub fn handle(data: Option<&HeroContent>, nodes: HeroNodes<'_>) {
    let Some(data) = data else {
        return;
    };

    if let Some(title) = data.title.as_deref().filter(|t| !t.is_empty()) {
        nodes.title.set_text(title);
    }

    if let Some(subtitle) = data.subtitle.as_deref().filter(|s| !s.is_empty()) {
        nodes.subtitle.set_text(subtitle);
    }
}
