//! Structural payload classification.

use hateoas_types::SELF_RELATION;
use serde_json::Value;
use std::fmt;

pub(crate) const LINKS_KEY: &str = "_links";
pub(crate) const EMBEDDED_KEY: &str = "_embedded";
pub(crate) const PAGE_KEY: &str = "page";

/// The closed set of shapes a HAL payload can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Resource,
    EmbeddedResource,
    ResourceCollection,
    PagedResourceCollection,
    /// Anything without usable HAL structure; passed through untouched and
    /// never cached.
    Opaque,
}

impl PayloadKind {
    /// Whether the payload carries HAL links.
    pub fn is_link_bearing(self) -> bool {
        self != Self::Opaque
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Resource => "Resource",
            Self::EmbeddedResource => "EmbeddedResource",
            Self::ResourceCollection => "ResourceCollection",
            Self::PagedResourceCollection => "PagedResourceCollection",
            Self::Opaque => "Opaque",
        };
        f.write_str(name)
    }
}

/// Classifies a raw payload by inspecting its top-level keys.
///
/// Collections must have exactly `_links` and `_embedded` (plus `page` for
/// the paged variant). Otherwise a non-empty `_links` map decides between
/// an addressable resource (`self` present) and an embedded one.
pub fn classify(payload: &Value) -> PayloadKind {
    let Some(map) = payload.as_object() else {
        return PayloadKind::Opaque;
    };

    let has_links = map.contains_key(LINKS_KEY);
    let has_embedded = map.contains_key(EMBEDDED_KEY);

    if has_links && has_embedded {
        match (map.len(), map.contains_key(PAGE_KEY)) {
            (3, true) => return PayloadKind::PagedResourceCollection,
            (2, false) => return PayloadKind::ResourceCollection,
            _ => {}
        }
    }

    match map.get(LINKS_KEY).and_then(Value::as_object) {
        Some(links) if links.contains_key(SELF_RELATION) => PayloadKind::Resource,
        Some(links) if !links.is_empty() => PayloadKind::EmbeddedResource,
        _ => PayloadKind::Opaque,
    }
}
