//! Binding raw payloads to registered resource types.

use crate::classify::{classify, PayloadKind, EMBEDDED_KEY, LINKS_KEY, PAGE_KEY};
use crate::collection::{PageMetadata, PagedResourceCollection, ResourceCollection};
use crate::property::{Properties, Property};
use crate::registry::{Constructor, TypeRegistry};
use crate::resource::Resource;
use hateoas_types::{ClientConfig, LinkSet};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Any materialized payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Materialized {
    Resource(Resource),
    Collection(ResourceCollection),
    Paged(PagedResourceCollection),
    /// Payloads without HAL structure, passed through unchanged.
    Opaque(Value),
}

impl Materialized {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Resource(resource) => resource.to_json(),
            Self::Collection(collection) => collection.to_json("resources"),
            Self::Paged(paged) => paged.to_json("resources"),
            Self::Opaque(value) => value.clone(),
        }
    }
}

/// Turns raw payloads into [`Resource`] graphs.
///
/// Never fails on unknown types: a missing registration falls back to the
/// default type and logs a warning. Malformed resource bodies produce `None`.
#[derive(Debug, Clone)]
pub struct ResourceMaterializer {
    registry: Arc<TypeRegistry>,
    root_url: String,
    proxy_url: Option<String>,
}

impl ResourceMaterializer {
    pub fn new(registry: Arc<TypeRegistry>, config: &ClientConfig) -> Self {
        Self {
            registry,
            root_url: config.root_url().to_string(),
            proxy_url: config.proxy().map(str::to_string),
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Materializes whatever the payload classifies as. Returns `None` only
    /// when a link-bearing payload is malformed.
    pub fn materialize(&self, payload: &Value, projection: bool) -> Option<Materialized> {
        match classify(payload) {
            PayloadKind::Resource | PayloadKind::EmbeddedResource => self
                .materialize_resource(payload, projection)
                .map(Materialized::Resource),
            PayloadKind::ResourceCollection => self
                .materialize_collection(payload, projection)
                .map(Materialized::Collection),
            PayloadKind::PagedResourceCollection => self
                .materialize_paged(payload, projection)
                .map(Materialized::Paged),
            PayloadKind::Opaque => Some(Materialized::Opaque(payload.clone())),
        }
    }

    /// Materializes a single resource.
    ///
    /// Returns `None` with a warning when the payload is empty or has no
    /// `_links`.
    pub fn materialize_resource(&self, payload: &Value, projection: bool) -> Option<Resource> {
        let Some(object) = payload.as_object().filter(|o| !o.is_empty()) else {
            warn!("resource payload is empty, nothing to materialize");
            return None;
        };
        let links = LinkSet::from_value(object.get(LINKS_KEY).unwrap_or(&Value::Null));
        if links.is_empty() {
            warn!("resource payload has no _links, nothing to materialize");
            return None;
        }

        if links.self_link().is_none() {
            let ctor = self.registry.default_embedded();
            return Some(self.instantiate(ctor, links, object, projection));
        }

        let name = self.resource_name(&links);
        let ctor = self.select_type(&name, projection);
        Some(self.instantiate(ctor, links, object, projection))
    }

    /// Materializes a `_links` + `_embedded` collection. Both must be
    /// non-empty objects.
    pub fn materialize_collection(
        &self,
        payload: &Value,
        projection: bool,
    ) -> Option<ResourceCollection> {
        let links = payload.get(LINKS_KEY).and_then(Value::as_object);
        let embedded = payload.get(EMBEDDED_KEY).and_then(Value::as_object);
        let (Some(links), Some(embedded)) = (links, embedded) else {
            debug!("collection payload lacks _links or _embedded");
            return None;
        };
        if links.is_empty() || embedded.is_empty() {
            debug!("collection payload has empty _links or _embedded");
            return None;
        }

        let mut resources = Vec::new();
        for (group, items) in embedded {
            let items = match items {
                Value::Array(items) => items.as_slice(),
                single => std::slice::from_ref(single),
            };
            for item in items {
                match self.materialize_resource(item, projection) {
                    Some(resource) => resources.push(resource),
                    None => warn!(group = %group, "skipping malformed collection element"),
                }
            }
        }

        Some(ResourceCollection::new(
            LinkSet::from_value(&Value::Object(links.clone())),
            resources,
        ))
    }

    /// Materializes a paged collection. Page metadata falls back to the
    /// defaults when absent or unreadable.
    pub fn materialize_paged(
        &self,
        payload: &Value,
        projection: bool,
    ) -> Option<PagedResourceCollection> {
        let collection = self.materialize_collection(payload, projection)?;
        let page = match payload.get(PAGE_KEY) {
            Some(raw) => serde_json::from_value::<PageMetadata>(raw.clone()).unwrap_or_else(|e| {
                warn!(error = %e, "unreadable page metadata, using defaults");
                PageMetadata::default()
            }),
            None => PageMetadata::default(),
        };
        Some(PagedResourceCollection::new(collection, page))
    }

    /// Resolves a property value found under `key`.
    pub fn resolve_property(&self, key: &str, value: &Value, projection: bool) -> Property {
        match value {
            Value::Null => Property::Null,
            Value::Array(items) => Property::Array(
                items
                    .iter()
                    .map(|item| self.resolve_property(key, item, projection))
                    .collect(),
            ),
            Value::Object(object) => self.resolve_object(key, object, projection),
            scalar => Property::Scalar(scalar.clone()),
        }
    }

    fn resolve_object(&self, key: &str, object: &Map<String, Value>, projection: bool) -> Property {
        let links = LinkSet::from_value(object.get(LINKS_KEY).unwrap_or(&Value::Null));

        if projection && let Some(ctor) = self.registry.projection_relation_type(key) {
            return self.instantiate(ctor, links, object, projection).into();
        }

        let registered_embedded = self.registry.embedded_type(key);
        let unaddressed = !links.is_empty() && links.self_link().is_none();
        if registered_embedded.is_some() || unaddressed {
            let ctor = registered_embedded.unwrap_or_else(|| self.registry.default_embedded());
            return self.instantiate(ctor, links, object, projection).into();
        }

        if links.self_link().is_some() {
            let name = self.resource_name(&links);
            let ctor = self.select_type(&name, projection);
            return self.instantiate(ctor, links, object, projection).into();
        }

        Property::Object(self.resolve_fields(object, projection))
    }

    fn resolve_fields(&self, object: &Map<String, Value>, projection: bool) -> Properties {
        object
            .iter()
            .filter(|(key, _)| key.as_str() != LINKS_KEY)
            .map(|(key, value)| (key.clone(), self.resolve_property(key, value, projection)))
            .collect()
    }

    fn instantiate(
        &self,
        ctor: &Constructor,
        links: LinkSet,
        object: &Map<String, Value>,
        projection: bool,
    ) -> Resource {
        let mut resource = ctor();
        resource.bind(links, self.resolve_fields(object, projection));
        resource
    }

    /// Resource name from the self href, relative to the proxy or root URL.
    fn resource_name(&self, links: &LinkSet) -> String {
        let Some(self_link) = links.self_link() else {
            return String::new();
        };
        let href = match hateoas_url::remove_template_params(&self_link.href) {
            Ok(href) => href,
            Err(e) => {
                warn!(href = %self_link.href, error = %e, "cannot clear self link template");
                return String::new();
            }
        };

        let from_proxy = self
            .proxy_url
            .as_deref()
            .map(|proxy| hateoas_url::resource_name_from_url(&href, proxy))
            .filter(|name| !name.is_empty());
        from_proxy.unwrap_or_else(|| hateoas_url::resource_name_from_url(&href, &self.root_url))
    }

    /// Picks the constructor for `name`, falling back instead of failing.
    fn select_type(&self, name: &str, projection: bool) -> &Constructor {
        if projection {
            if let Some(ctor) = self.registry.projection_type(name) {
                return ctor;
            }
            warn!(resource = %name, "no projection type registered, using resource type");
        }
        if let Some(ctor) = self.registry.resource_type(name) {
            return ctor;
        }
        warn!(resource = %name, "no resource type registered, using default type");
        self.registry.default_resource()
    }
}
