//! Resource collections, plain and paged.

use crate::relational::Relational;
use crate::resource::Resource;
use hateoas_types::{Link, LinkSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An `_embedded` collection of resources plus its links.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceCollection {
    links: LinkSet,
    resources: Vec<Resource>,
}

impl ResourceCollection {
    pub fn new(links: LinkSet, resources: Vec<Resource>) -> Self {
        Self { links, resources }
    }

    /// Resources in `_embedded` encounter order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn into_resources(self) -> Vec<Resource> {
        self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.resources.iter()
    }

    /// HAL JSON with all resources grouped under one `_embedded` key.
    pub fn to_json(&self, group: &str) -> Value {
        let items: Vec<Value> = self.resources.iter().map(Resource::to_json).collect();
        serde_json::json!({
            "_embedded": { group: items },
            "_links": self.links.to_value(),
        })
    }
}

impl Relational for ResourceCollection {
    fn links(&self) -> &LinkSet {
        &self.links
    }
}

impl<'a> IntoIterator for &'a ResourceCollection {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}

/// The `page` block of a paged collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMetadata {
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
}

impl Default for PageMetadata {
    fn default() -> Self {
        Self {
            size: 20,
            total_elements: 0,
            total_pages: 1,
            number: 0,
        }
    }
}

/// A collection with page metadata and `first`/`prev`/`next`/`last`
/// navigation links.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagedResourceCollection {
    collection: ResourceCollection,
    page: PageMetadata,
}

impl PagedResourceCollection {
    pub fn new(collection: ResourceCollection, page: PageMetadata) -> Self {
        Self { collection, page }
    }

    pub fn collection(&self) -> &ResourceCollection {
        &self.collection
    }

    pub fn into_collection(self) -> ResourceCollection {
        self.collection
    }

    pub fn resources(&self) -> &[Resource] {
        self.collection.resources()
    }

    pub fn page(&self) -> &PageMetadata {
        &self.page
    }

    pub fn total_elements(&self) -> u64 {
        self.page.total_elements
    }

    pub fn total_pages(&self) -> u32 {
        self.page.total_pages
    }

    pub fn page_number(&self) -> u32 {
        self.page.number
    }

    pub fn page_size(&self) -> u32 {
        self.page.size
    }

    pub fn self_link(&self) -> Option<&Link> {
        self.links().self_link()
    }

    pub fn first_link(&self) -> Option<&Link> {
        self.links().get("first")
    }

    pub fn prev_link(&self) -> Option<&Link> {
        self.links().get("prev")
    }

    pub fn next_link(&self) -> Option<&Link> {
        self.links().get("next")
    }

    pub fn last_link(&self) -> Option<&Link> {
        self.links().get("last")
    }

    pub fn has_first(&self) -> bool {
        self.first_link().is_some()
    }

    pub fn has_prev(&self) -> bool {
        self.prev_link().is_some()
    }

    pub fn has_next(&self) -> bool {
        self.next_link().is_some()
    }

    pub fn has_last(&self) -> bool {
        self.last_link().is_some()
    }

    pub fn to_json(&self, group: &str) -> Value {
        let mut json = self.collection.to_json(group);
        if let Value::Object(map) = &mut json {
            map.insert(
                "page".to_string(),
                serde_json::to_value(self.page).unwrap_or(Value::Null),
            );
        }
        json
    }
}

impl Relational for PagedResourceCollection {
    fn links(&self) -> &LinkSet {
        self.collection.links()
    }
}
