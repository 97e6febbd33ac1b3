//! Materialized HAL resources.

use crate::classify::LINKS_KEY;
use crate::property::{Properties, Property};
use crate::registry::DEFAULT_RESOURCE_TYPE;
use crate::relational::Relational;
use hateoas_types::{HateoasResult, LinkSet};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Whether a resource is addressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Has a `self` link.
    Resource,
    /// A value object without a `self` link.
    Embedded,
}

/// A payload bound to a registered type.
///
/// The type name comes from the constructor that produced the instance, not
/// from any field in the payload. Constructors may pre-populate properties;
/// payload fields are copied over them when the resource is bound.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    type_name: String,
    links: LinkSet,
    properties: Properties,
}

impl Default for Resource {
    fn default() -> Self {
        Self::new(DEFAULT_RESOURCE_TYPE)
    }
}

impl Resource {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            links: LinkSet::new(),
            properties: Properties::new(),
        }
    }

    /// Builder-style property default, used by constructors.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Property>) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn with_links(mut self, links: LinkSet) -> Self {
        self.links = links;
        self
    }

    /// Copies payload links and fields onto this instance.
    pub(crate) fn bind(&mut self, links: LinkSet, properties: Properties) {
        self.links = links;
        self.properties.merge(properties);
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn kind(&self) -> ResourceKind {
        if self.links.self_link().is_some() {
            ResourceKind::Resource
        } else {
            ResourceKind::Embedded
        }
    }

    pub fn is_embedded(&self) -> bool {
        self.kind() == ResourceKind::Embedded
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Property>) {
        self.properties.insert(key, value);
    }

    /// Href of the `self` link, if any.
    pub fn self_href(&self) -> Option<&str> {
        self.links.self_link().map(|link| link.href.as_str())
    }

    /// Case-insensitive check of the bound type name.
    pub fn is_resource_of(&self, type_name: &str) -> bool {
        self.type_name.eq_ignore_ascii_case(type_name)
    }

    /// Last path segment of the self href, templates stripped.
    pub fn resource_id(&self) -> Option<String> {
        hateoas_url::last_segment(self.self_href()?)
    }

    /// The resource as HAL JSON: properties followed by `_links`.
    pub fn to_json(&self) -> Value {
        let mut json = self.properties.to_json();
        if let Value::Object(map) = &mut json
            && !self.links.is_empty()
        {
            map.insert(LINKS_KEY.to_string(), self.links.to_value());
        }
        json
    }

    /// Deserializes the bound fields into a typed view.
    pub fn deserialize<T: DeserializeOwned>(&self) -> HateoasResult<T> {
        Ok(serde_json::from_value(self.to_json())?)
    }
}

impl Relational for Resource {
    fn links(&self) -> &LinkSet {
        &self.links
    }
}
