//! HAL `_links` representation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Name of the relation that identifies an addressable resource.
pub const SELF_RELATION: &str = "self";

/// A single HAL link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templated: Option<bool>,
}

impl Link {
    /// Creates a plain (non-templated) link.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            templated: None,
        }
    }

    /// Creates a link flagged as an RFC6570 template.
    pub fn templated(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            templated: Some(true),
        }
    }

    pub fn is_templated(&self) -> bool {
        self.templated.unwrap_or(false)
    }
}

/// Relation name to [`Link`] mapping.
///
/// A set containing [`SELF_RELATION`] marks its owner as an addressable
/// resource; a set without it marks an embedded value object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkSet(BTreeMap<String, Link>);

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, used when assembling link sets by hand.
    pub fn with(mut self, relation: impl Into<String>, link: Link) -> Self {
        self.0.insert(relation.into(), link);
        self
    }

    /// Reads a raw `_links` value.
    ///
    /// Entries that are not link objects are skipped. A relation holding an
    /// array of links keeps its first element.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        let links = map
            .iter()
            .filter_map(|(relation, raw)| {
                let raw = match raw {
                    Value::Array(items) => items.first()?,
                    other => other,
                };
                let link = serde_json::from_value::<Link>(raw.clone()).ok()?;
                Some((relation.clone(), link))
            })
            .collect();

        Self(links)
    }

    pub fn get(&self, relation: &str) -> Option<&Link> {
        self.0.get(relation)
    }

    pub fn contains(&self, relation: &str) -> bool {
        self.0.contains_key(relation)
    }

    /// The `self` link, present only on addressable resources.
    pub fn self_link(&self) -> Option<&Link> {
        self.get(SELF_RELATION)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn relations(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Link)> {
        self.0.iter().map(|(relation, link)| (relation.as_str(), link))
    }

    /// Serializes back into the wire `_links` shape.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl FromIterator<(String, Link)> for LinkSet {
    fn from_iter<I: IntoIterator<Item = (String, Link)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
