//! Response cache for the hateoas HAL client.
//!
//! Entries are keyed by [`CacheKey`], a canonical string built from the
//! request URL, its encoded query and the observe mode. Expiry is lazy: an
//! entry past its lifetime is removed on the next [`CacheStore::get`].
//! Eviction is deliberately coarse and removes every entry under the same
//! resource root, so a write to one item also drops cached lists and pages
//! of that resource.

mod key;
mod store;

pub use key::CacheKey;
pub use store::CacheStore;
