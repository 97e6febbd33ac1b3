//! Request-body flattening.

use crate::property::{Properties, Property};
use crate::resource::Resource;
use hateoas_types::ValuesOption;
use serde_json::{Map, Value};

/// Flattens a request body to its wire form.
///
/// Every addressable resource is replaced by its self href, at any depth.
/// Null fields are dropped unless `option.include_nulls` is set. An empty or
/// null body yields `None`; scalars pass through. A top-level resource is
/// flattened field by field rather than collapsed to its href.
pub fn resolve_values(body: &Property, option: ValuesOption) -> Option<Value> {
    match body {
        Property::Null => None,
        Property::Scalar(value) => Some(value.clone()),
        Property::Array(items) if items.is_empty() => None,
        Property::Array(items) => Some(resolve_array(items, option)),
        Property::Object(object) if object.is_empty() => None,
        Property::Object(object) => Some(resolve_object(object, option)),
        Property::Resource(resource) if resource.properties().is_empty() => None,
        Property::Resource(resource) => Some(resolve_object(resource.properties(), option)),
    }
}

fn resolve_object(object: &Properties, option: ValuesOption) -> Value {
    let mut out = Map::new();
    for (key, value) in object.iter() {
        match value {
            Property::Null if option.include_nulls => {
                out.insert(key.to_string(), Value::Null);
            }
            Property::Null => {}
            other => {
                out.insert(key.to_string(), resolve_nested(other, option));
            }
        }
    }
    Value::Object(out)
}

fn resolve_array(items: &[Property], option: ValuesOption) -> Value {
    Value::Array(items.iter().map(|item| resolve_nested(item, option)).collect())
}

fn resolve_nested(value: &Property, option: ValuesOption) -> Value {
    match value {
        Property::Null => Value::Null,
        Property::Scalar(value) => value.clone(),
        Property::Array(items) => resolve_array(items, option),
        Property::Object(object) => resolve_object(object, option),
        Property::Resource(resource) => resource_reference(resource, option),
    }
}

/// Addressable resources collapse to their href with templates cleared;
/// embedded ones keep their fields.
fn resource_reference(resource: &Resource, option: ValuesOption) -> Value {
    match resource.self_href() {
        Some(href) => Value::String(
            hateoas_url::remove_template_params(href).unwrap_or_else(|_| href.to_string()),
        ),
        None => resolve_object(resource.properties(), option),
    }
}
