//! Resolved property tree.

use crate::classify::LINKS_KEY;
use crate::resource::Resource;
use hateoas_types::LinkSet;
use serde_json::{Map, Value};

/// A resolved payload value.
///
/// Objects that carry HAL links become [`Property::Resource`]; every other
/// JSON shape keeps its structure.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Null,
    /// A bool, number or string.
    Scalar(Value),
    Array(Vec<Property>),
    Object(Properties),
    Resource(Box<Resource>),
}

impl Property {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Self::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Properties> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Property]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => value.as_str(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Scalar(value) => value.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Scalar(value) => value.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(value) => value.as_bool(),
            _ => None,
        }
    }

    /// Converts back to JSON, including `_links` of nested resources.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Scalar(value) => value.clone(),
            Self::Array(items) => Value::Array(items.iter().map(Property::to_json).collect()),
            Self::Object(object) => object.to_json(),
            Self::Resource(resource) => resource.to_json(),
        }
    }
}

/// Structural conversion with no registry involved. Objects with a non-empty
/// `_links` map become resources of the default type.
impl From<Value> for Property {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Array(items) => Self::Array(items.into_iter().map(Property::from).collect()),
            Value::Object(mut map) => {
                let links = map
                    .get(LINKS_KEY)
                    .map(LinkSet::from_value)
                    .unwrap_or_default();
                if links.is_empty() {
                    return Self::Object(Properties::from(map));
                }
                map.remove(LINKS_KEY);
                let mut resource = Resource::default();
                resource.bind(links, Properties::from(map));
                Self::Resource(Box::new(resource))
            }
            scalar => Self::Scalar(scalar),
        }
    }
}

impl From<Resource> for Property {
    fn from(resource: Resource) -> Self {
        Self::Resource(Box::new(resource))
    }
}

impl From<Properties> for Property {
    fn from(properties: Properties) -> Self {
        Self::Object(properties)
    }
}

/// Insertion-ordered property map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Vec<(String, Property)>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Property>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces `key`, keeping the original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Property>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<Property> {
        let idx = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(idx).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overlays `other` onto `self`, key by key.
    pub fn merge(&mut self, other: Properties) {
        for (key, value) in other.0 {
            self.insert(key, value);
        }
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }
}

impl From<Map<String, Value>> for Properties {
    fn from(map: Map<String, Value>) -> Self {
        Self(
            map.into_iter()
                .map(|(k, v)| (k, Property::from(v)))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Property>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Self::new();
        for (key, value) in iter {
            properties.insert(key, value);
        }
        properties
    }
}

impl IntoIterator for Properties {
    type Item = (String, Property);
    type IntoIter = std::vec::IntoIter<(String, Property)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
