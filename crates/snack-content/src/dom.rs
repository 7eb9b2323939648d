//! Page model that content handlers write into.
//!
//! The page owns a fixed set of nodes addressed by static ids. Handlers never
//! see the whole page; they receive a handle borrowing only their own nodes.

use std::fmt;

/// Id of the hero heading node.
pub const HERO_TITLE_ID: &str = "hero-title";
/// Id of the hero subheading node.
pub const HERO_SUBTITLE_ID: &str = "hero-subtitle";
/// Selector of the container holding social links.
pub const SOCIAL_CONTAINER_SELECTOR: &str = "#social-links .flex";

/// A node holding plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextNode {
    text: String,
}

impl TextNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Current text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Overwrite the text content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An HTML element with ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing any previous value.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    /// Append a child node.
    pub fn child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Look up an attribute value.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attrs {
            write!(f, " {}=\"{}\"", name, html_escape(value))?;
        }
        f.write_str(">")?;
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element(el) => el.fmt(f),
            Node::Text(text) => write!(f, "{}", html_escape(text)),
        }
    }
}

/// Escape HTML special characters including single quotes.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// A node whose children are replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    children: Vec<Element>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every child.
    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Append a child element.
    pub fn append(&mut self, element: Element) {
        self.children.push(element);
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Render the children as HTML markup.
    pub fn inner_html(&self) -> String {
        self.children.iter().map(|c| c.to_string()).collect()
    }
}

/// Handle to the hero section nodes.
#[derive(Debug)]
pub struct HeroNodes<'a> {
    pub title: &'a mut TextNode,
    pub subtitle: &'a mut TextNode,
}

/// Handle to the social links container.
#[derive(Debug)]
pub struct SocialNodes<'a> {
    pub container: &'a mut Container,
}

/// The set of nodes a site page exposes to content handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    hero_title: TextNode,
    hero_subtitle: TextNode,
    social_links: Container,
}

impl Page {
    /// Create a page with initial hero text.
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            hero_title: TextNode::new(title),
            hero_subtitle: TextNode::new(subtitle),
            social_links: Container::new(),
        }
    }

    pub fn hero_nodes(&mut self) -> HeroNodes<'_> {
        HeroNodes {
            title: &mut self.hero_title,
            subtitle: &mut self.hero_subtitle,
        }
    }

    pub fn social_nodes(&mut self) -> SocialNodes<'_> {
        SocialNodes {
            container: &mut self.social_links,
        }
    }

    pub fn hero_title(&self) -> &TextNode {
        &self.hero_title
    }

    pub fn hero_subtitle(&self) -> &TextNode {
        &self.hero_subtitle
    }

    pub fn social_links(&self) -> &Container {
        &self.social_links
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new("Welcome to my blog", "Thoughts, notes and snacks")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_escaped_markup() {
        let el = Element::new("a")
            .attr("href", "https://x?a=1&b=\"2\"")
            .child(Node::Text("<hi>".to_string()));

        assert_eq!(
            el.to_string(),
            "<a href=\"https://x?a=1&amp;b=&quot;2&quot;\">&lt;hi&gt;</a>"
        );
    }

    #[test]
    fn attr_replaces_existing_value() {
        let el = Element::new("a").attr("href", "one").attr("href", "two");
        assert_eq!(el.get_attr("href"), Some("two"));
    }

    #[test]
    fn container_clear_then_append() {
        let mut container = Container::new();
        container.append(Element::new("a"));
        container.clear();
        container.append(Element::new("b"));

        assert_eq!(container.children().len(), 1);
        assert_eq!(container.inner_html(), "<b></b>");
    }
}
