//! Resource model for the hateoas HAL client.
//!
//! Raw JSON payloads are turned into link-traversable objects here:
//!
//! - [`classify`] sorts a payload into one of the closed [`PayloadKind`]
//!   variants by key presence alone
//! - [`TypeRegistry`] maps resource names, projection names, projection
//!   relation keys and embedded keys to constructors
//! - [`ResourceMaterializer`] walks a payload and binds it to registered
//!   types, falling back to a default type with a warning instead of failing
//! - [`resolve_values`] flattens a request body back to the link-based wire
//!   shape
//!
//! Materialized objects never alias the cache: every call builds a fresh
//! object graph from the raw payload.

mod classify;
mod collection;
mod materializer;
mod property;
mod registry;
mod relational;
mod resource;
mod values;

pub use classify::{classify, PayloadKind};
pub use collection::{PageMetadata, PagedResourceCollection, ResourceCollection};
pub use materializer::{Materialized, ResourceMaterializer};
pub use property::{Properties, Property};
pub use registry::{Constructor, TypeRegistry, DEFAULT_EMBEDDED_TYPE, DEFAULT_RESOURCE_TYPE};
pub use relational::Relational;
pub use resource::{Resource, ResourceKind};
pub use values::resolve_values;
