//! Social links handler: replaces the container's children with one anchor per link.

use crate::dom::{Element, Node, SocialNodes};
use crate::payload::{SocialContent, SocialLink};

const LINK_CLASSES: &str = "w-10 h-10 bg-gray-800 rounded-full flex items-center justify-center hover:bg-purple-600 transition";

/// Apply social content.
///
/// The container is cleared and rebuilt on every call, so applying the same
/// payload twice leaves the same children. Links without a URL are skipped.
pub fn handle(data: Option<&SocialContent>, nodes: SocialNodes<'_>) {
    let Some(links) = data.and_then(|d| d.links.as_ref()) else {
        return;
    };

    nodes.container.clear();

    for link in links {
        match link_element(link) {
            Some(el) => nodes.container.append(el),
            None => tracing::debug!("Skipping social link without url: {:?}", link),
        }
    }
}

/// Build the anchor element for a single link.
fn link_element(link: &SocialLink) -> Option<Element> {
    let url = link.url.as_deref().filter(|u| !u.is_empty())?;
    let platform = link.platform.as_deref().unwrap_or_default();
    let icon = link.icon.as_deref().unwrap_or_default();

    let icon = Element::new("i").attr("class", format!("{} text-lg", icon).trim_start());

    Some(
        Element::new("a")
            .attr("href", url)
            .attr("target", "_blank")
            .attr("rel", "noopener noreferrer")
            .attr("class", LINK_CLASSES)
            .attr("aria-label", platform)
            .child(Node::Element(icon)),
    )
}
