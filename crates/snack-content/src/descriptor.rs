//! Content descriptors and the closed set of content kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ContentError;
use crate::payload::{HeroContent, Payload, SocialContent};

/// The kinds of content a site knows how to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Hero section title and subtitle
    Hero,
    /// Footer social links
    Social,
}

impl ContentKind {
    /// All known kinds.
    pub const ALL: [ContentKind; 2] = [ContentKind::Hero, ContentKind::Social];

    /// The handler key used in config files.
    pub fn key(self) -> &'static str {
        match self {
            ContentKind::Hero => "hero",
            ContentKind::Social => "social",
        }
    }

    /// Decode a parsed JSON value into this kind's payload.
    ///
    /// `null` decodes to an empty payload, which every handler treats as a no-op.
    pub fn decode(self, value: Value) -> Result<Payload, ContentError> {
        let shape = |e: serde_json::Error| ContentError::Shape {
            kind: self.key(),
            message: e.to_string(),
        };

        match self {
            ContentKind::Hero => {
                let data: Option<HeroContent> = serde_json::from_value(value).map_err(shape)?;
                Ok(Payload::Hero(data))
            }
            ContentKind::Social => {
                let data: Option<SocialContent> = serde_json::from_value(value).map_err(shape)?;
                Ok(Payload::Social(data))
            }
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ContentKind {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentKind::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| ContentError::UnknownHandler(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for ContentKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}

/// A JSON resource paired with the kind that applies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDescriptor {
    resource_path: String,
    kind: ContentKind,
}

impl ContentDescriptor {
    /// Create a descriptor for a resource path relative to the content root.
    pub fn new(resource_path: impl Into<String>, kind: ContentKind) -> Result<Self, ContentError> {
        let resource_path = resource_path.into();
        if resource_path.trim().is_empty() {
            return Err(ContentError::InvalidPath(resource_path));
        }
        Ok(Self {
            resource_path,
            kind,
        })
    }

    /// Create a descriptor from a handler key such as `"hero"`.
    pub fn from_key(resource_path: impl Into<String>, handler: &str) -> Result<Self, ContentError> {
        Self::new(resource_path, handler.parse()?)
    }

    /// Resource location, relative to the content root.
    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    /// Content kind that handles this resource.
    pub fn kind(&self) -> ContentKind {
        self.kind
    }
}

/// Check that no two descriptors share a kind.
///
/// Each kind owns its page nodes, so a second descriptor of the same kind
/// would make the final page depend on which fetch settles last.
pub fn check_unique_kinds(descriptors: &[ContentDescriptor]) -> Result<(), ContentError> {
    for (i, descriptor) in descriptors.iter().enumerate() {
        if let Some(first) = descriptors[..i].iter().find(|d| d.kind == descriptor.kind) {
            return Err(ContentError::DuplicateKind {
                kind: descriptor.kind.key(),
                first: first.resource_path.clone(),
                second: descriptor.resource_path.clone(),
            });
        }
    }
    Ok(())
}

/// Descriptors used when a site config does not list its own.
pub fn default_descriptors() -> Vec<ContentDescriptor> {
    vec![
        ContentDescriptor {
            resource_path: "hero.json".to_string(),
            kind: ContentKind::Hero,
        },
        ContentDescriptor {
            resource_path: "social.json".to_string(),
            kind: ContentKind::Social,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_known_handler_keys() {
        assert_eq!("hero".parse::<ContentKind>().unwrap(), ContentKind::Hero);
        assert_eq!("social".parse::<ContentKind>().unwrap(), ContentKind::Social);
    }

    #[test]
    fn rejects_unknown_handler_at_construction() {
        let err = ContentDescriptor::from_key("about.json", "about").unwrap_err();
        assert!(matches!(err, ContentError::UnknownHandler(ref k) if k == "about"));
    }

    #[test]
    fn rejects_empty_resource_path() {
        assert!(ContentDescriptor::new("  ", ContentKind::Hero).is_err());
    }

    #[test]
    fn null_decodes_to_empty_payload() {
        let payload = ContentKind::Hero.decode(Value::Null).unwrap();
        assert!(matches!(payload, Payload::Hero(None)));
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let err = ContentKind::Social
            .decode(json!({ "links": "not a list" }))
            .unwrap_err();
        assert!(matches!(err, ContentError::Shape { kind: "social", .. }));
    }

    #[test]
    fn duplicate_kinds_are_rejected() {
        let descriptors = vec![
            ContentDescriptor::new("a.json", ContentKind::Hero).unwrap(),
            ContentDescriptor::new("social.json", ContentKind::Social).unwrap(),
            ContentDescriptor::new("b.json", ContentKind::Hero).unwrap(),
        ];

        let err = check_unique_kinds(&descriptors).unwrap_err();
        assert!(matches!(
            err,
            ContentError::DuplicateKind { kind: "hero", ref first, ref second }
                if first == "a.json" && second == "b.json"
        ));
        assert!(check_unique_kinds(&default_descriptors()).is_ok());
    }

    #[test]
    fn default_descriptors_cover_every_kind() {
        let kinds: Vec<_> = default_descriptors().iter().map(|d| d.kind()).collect();
        assert_eq!(kinds, ContentKind::ALL.to_vec());
    }
}
