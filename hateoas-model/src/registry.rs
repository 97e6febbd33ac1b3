//! Runtime type registry.
//!
//! Populated once during bootstrap, then frozen by moving it into an `Arc`
//! and handing that to the materializer. Lookups on the frozen registry need
//! no locking.

use crate::resource::Resource;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Type name given to resources with no registered type.
pub const DEFAULT_RESOURCE_TYPE: &str = "Resource";
/// Type name given to embedded objects with no registered type.
pub const DEFAULT_EMBEDDED_TYPE: &str = "EmbeddedResource";

/// Zero-argument factory for a resource type.
pub type Constructor = Arc<dyn Fn() -> Resource + Send + Sync>;

/// Four independent name → constructor maps. Keys are lowercased.
pub struct TypeRegistry {
    resources: HashMap<String, Constructor>,
    projections: HashMap<String, Constructor>,
    projection_relations: HashMap<String, Constructor>,
    embedded: HashMap<String, Constructor>,
    default_resource: Constructor,
    default_embedded: Constructor,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self {
            resources: HashMap::new(),
            projections: HashMap::new(),
            projection_relations: HashMap::new(),
            embedded: HashMap::new(),
            default_resource: Arc::new(|| Resource::new(DEFAULT_RESOURCE_TYPE)),
            default_embedded: Arc::new(|| Resource::new(DEFAULT_EMBEDDED_TYPE)),
        }
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn sorted(map: &HashMap<String, Constructor>) -> Vec<&str> {
            let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
            keys.sort_unstable();
            keys
        }
        f.debug_struct("TypeRegistry")
            .field("resources", &sorted(&self.resources))
            .field("projections", &sorted(&self.projections))
            .field("projection_relations", &sorted(&self.projection_relations))
            .field("embedded", &sorted(&self.embedded))
            .finish()
    }
}

fn insert(
    map: &mut HashMap<String, Constructor>,
    kind: &str,
    key: &str,
    ctor: Constructor,
) {
    let key = key.to_lowercase();
    if map.insert(key.clone(), ctor).is_some() {
        warn!(kind, key = %key, "replacing previously registered type");
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the type for a resource name (first path segment below the
    /// API root).
    pub fn register_resource<F>(&mut self, name: &str, ctor: F) -> &mut Self
    where
        F: Fn() -> Resource + Send + Sync + 'static,
    {
        insert(&mut self.resources, "resource", name, Arc::new(ctor));
        self
    }

    /// Registers the type used for a resource name when a projection is
    /// requested.
    pub fn register_projection<F>(&mut self, name: &str, ctor: F) -> &mut Self
    where
        F: Fn() -> Resource + Send + Sync + 'static,
    {
        insert(&mut self.projections, "projection", name, Arc::new(ctor));
        self
    }

    /// Registers the type of a property that holds a related resource inside
    /// a projection.
    pub fn register_projection_relation<F>(&mut self, property_key: &str, ctor: F) -> &mut Self
    where
        F: Fn() -> Resource + Send + Sync + 'static,
    {
        insert(
            &mut self.projection_relations,
            "projection relation",
            property_key,
            Arc::new(ctor),
        );
        self
    }

    /// Registers the type of a property that holds an embedded value object.
    pub fn register_embedded<F>(&mut self, property_key: &str, ctor: F) -> &mut Self
    where
        F: Fn() -> Resource + Send + Sync + 'static,
    {
        insert(&mut self.embedded, "embedded", property_key, Arc::new(ctor));
        self
    }

    /// Overrides the constructor used when no resource type is registered.
    pub fn set_default_resource<F>(&mut self, ctor: F) -> &mut Self
    where
        F: Fn() -> Resource + Send + Sync + 'static,
    {
        self.default_resource = Arc::new(ctor);
        self
    }

    pub fn resource_type(&self, name: &str) -> Option<&Constructor> {
        self.resources.get(&name.to_lowercase())
    }

    pub fn projection_type(&self, name: &str) -> Option<&Constructor> {
        self.projections.get(&name.to_lowercase())
    }

    pub fn projection_relation_type(&self, property_key: &str) -> Option<&Constructor> {
        self.projection_relations.get(&property_key.to_lowercase())
    }

    pub fn embedded_type(&self, property_key: &str) -> Option<&Constructor> {
        self.embedded.get(&property_key.to_lowercase())
    }

    pub fn default_resource(&self) -> &Constructor {
        &self.default_resource
    }

    pub fn default_embedded(&self) -> &Constructor {
        &self.default_embedded
    }

    /// Freezes the registry for sharing.
    pub fn freeze(self) -> Arc<Self> {
        Arc::new(self)
    }
}
