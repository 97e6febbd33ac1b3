//! Tests for resource materialization and type selection.

use hateoas_model::{
    Materialized, PageMetadata, Property, Relational, Resource, ResourceKind, ResourceMaterializer,
    TypeRegistry, DEFAULT_EMBEDDED_TYPE, DEFAULT_RESOURCE_TYPE,
};
use hateoas_types::ClientConfig;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register_resource("books", || Resource::new("Book"))
        .register_resource("authors", || Resource::new("Author"))
        .register_projection("books", || Resource::new("BookProjection"))
        .register_projection_relation("author", || Resource::new("AuthorView"))
        .register_embedded("address", || Resource::new("Address"));
    registry
}

fn materializer() -> ResourceMaterializer {
    ResourceMaterializer::new(registry().freeze(), &ClientConfig::new("http://api"))
}

fn book(id: u32) -> serde_json::Value {
    json!({
        "title": format!("Book {id}"),
        "_links": {
            "self": {"href": format!("http://api/books/{id}")},
            "author": {"href": format!("http://api/books/{id}/author")}
        }
    })
}

// ── Resources ───────────────────────────────────────────────────

#[test]
fn resource_binds_registered_type() {
    let payload = json!({"_links": {"self": {"href": "http://api/books/5"}}, "title": "X"});
    let resource = materializer().materialize_resource(&payload, false).unwrap();

    assert_eq!(resource.type_name(), "Book");
    assert_eq!(resource.kind(), ResourceKind::Resource);
    assert_eq!(resource.relation_link("self").unwrap().href, "http://api/books/5");
    assert_eq!(resource.get("title").and_then(Property::as_str), Some("X"));
    assert!(resource.is_resource_of("book"));
}

#[test]
fn resource_name_ignores_payload_fields_and_templates() {
    let payload = json!({
        "_links": {"self": {"href": "http://api/Books/7{?projection}", "templated": true}},
        "type": "authors"
    });
    let resource = materializer().materialize_resource(&payload, false).unwrap();
    assert_eq!(resource.type_name(), "Book");
    assert_eq!(resource.resource_id().as_deref(), Some("7"));
}

#[test]
fn unregistered_name_falls_back_to_default_type() {
    let payload = json!({"_links": {"self": {"href": "http://api/magazines/1"}}});
    let resource = materializer().materialize_resource(&payload, false).unwrap();
    assert_eq!(resource.type_name(), DEFAULT_RESOURCE_TYPE);
}

#[test]
fn top_level_embedded_payload_uses_embedded_type() {
    let payload = json!({"street": "Main", "_links": {"owner": {"href": "http://api/authors/1"}}});
    let resource = materializer().materialize_resource(&payload, false).unwrap();
    assert_eq!(resource.type_name(), DEFAULT_EMBEDDED_TYPE);
    assert!(resource.is_embedded());

    match materializer().materialize(&payload, false) {
        Some(Materialized::Resource(resource)) => {
            assert_eq!(resource.type_name(), DEFAULT_EMBEDDED_TYPE)
        }
        other => panic!("expected embedded resource, got {other:?}"),
    }
}

#[test]
fn projection_uses_projection_type() {
    let resource = materializer().materialize_resource(&book(1), true).unwrap();
    assert_eq!(resource.type_name(), "BookProjection");
}

#[test]
fn missing_projection_type_falls_back_to_resource_type() {
    let payload = json!({"_links": {"self": {"href": "http://api/authors/1"}}});
    let resource = materializer().materialize_resource(&payload, true).unwrap();
    assert_eq!(resource.type_name(), "Author");
}

#[test]
fn proxy_base_resolves_names() {
    let config = ClientConfig::new("http://api").with_proxy("http://proxy/api");
    let materializer = ResourceMaterializer::new(registry().freeze(), &config);
    let payload = json!({"_links": {"self": {"href": "http://proxy/api/books/5"}}});
    let resource = materializer.materialize_resource(&payload, false).unwrap();
    assert_eq!(resource.type_name(), "Book");
}

#[test]
fn constructor_defaults_are_overwritten_by_payload() {
    let mut registry = TypeRegistry::new();
    registry.register_resource("books", || {
        Resource::new("Book")
            .with_property("title", json!("untitled"))
            .with_property("pages", json!(0))
    });
    let materializer = ResourceMaterializer::new(registry.freeze(), &ClientConfig::new("http://api"));
    let resource = materializer.materialize_resource(&book(2), false).unwrap();

    assert_eq!(resource.get("title").and_then(Property::as_str), Some("Book 2"));
    assert_eq!(resource.get("pages").and_then(Property::as_i64), Some(0));
}

#[test]
fn malformed_resources_are_soft_failures() {
    let m = materializer();
    assert!(m.materialize_resource(&json!({}), false).is_none());
    assert!(m.materialize_resource(&json!({"title": "X"}), false).is_none());
    assert!(m.materialize_resource(&json!({"_links": {}}), false).is_none());
    assert!(m.materialize_resource(&json!(null), false).is_none());
}

// ── Nested properties ───────────────────────────────────────────

#[test]
fn nested_values_resolve_by_shape() {
    let payload = json!({
        "_links": {"self": {"href": "http://api/books/1"}},
        "author": {"name": "Ann", "_links": {"self": {"href": "http://api/authors/1"}}},
        "address": {"street": "Main"},
        "publisher": {"name": "P", "_links": {"web": {"href": "http://p.example"}}},
        "meta": {"isbn": "123"},
        "tags": ["a", null],
        "missing": null
    });
    let resource = materializer().materialize_resource(&payload, false).unwrap();

    let author = resource.get("author").and_then(Property::as_resource).unwrap();
    assert_eq!(author.type_name(), "Author");

    let address = resource.get("address").and_then(Property::as_resource).unwrap();
    assert_eq!(address.type_name(), "Address");
    assert!(address.is_embedded());

    let publisher = resource.get("publisher").and_then(Property::as_resource).unwrap();
    assert_eq!(publisher.type_name(), DEFAULT_EMBEDDED_TYPE);

    assert!(resource.get("meta").and_then(Property::as_object).is_some());
    assert_eq!(
        resource.get("tags").and_then(Property::as_array).map(<[Property]>::len),
        Some(2)
    );
    assert!(resource.get("missing").is_some_and(Property::is_null));
}

#[test]
fn projection_relation_takes_priority() {
    let payload = json!({
        "_links": {"self": {"href": "http://api/books/1"}},
        "author": {"name": "Ann", "_links": {"self": {"href": "http://api/authors/1"}}}
    });
    let m = materializer();

    let projected = m.materialize_resource(&payload, true).unwrap();
    let author = projected.get("author").and_then(Property::as_resource).unwrap();
    assert_eq!(author.type_name(), "AuthorView");

    let plain = m.materialize_resource(&payload, false).unwrap();
    let author = plain.get("author").and_then(Property::as_resource).unwrap();
    assert_eq!(author.type_name(), "Author");
}

// ── Collections ─────────────────────────────────────────────────

#[test]
fn collection_keeps_encounter_order() {
    let payload = json!({
        "_links": {"self": {"href": "http://api/books"}},
        "_embedded": {"books": [book(1), book(2)]}
    });
    let collection = materializer().materialize_collection(&payload, false).unwrap();

    assert_eq!(collection.len(), 2);
    let titles: Vec<_> = collection
        .iter()
        .filter_map(|r| r.get("title").and_then(Property::as_str))
        .collect();
    assert_eq!(titles, vec!["Book 1", "Book 2"]);
    assert!(collection.has_relation("self"));
}

#[test]
fn collection_walks_every_group() {
    let payload = json!({
        "_links": {"self": {"href": "http://api/search"}},
        "_embedded": {
            "books": [book(1)],
            "authors": [{"_links": {"self": {"href": "http://api/authors/9"}}}]
        }
    });
    let collection = materializer().materialize_collection(&payload, false).unwrap();
    let types: Vec<_> = collection.iter().map(Resource::type_name).collect();
    assert_eq!(types, vec!["Book", "Author"]);
}

#[test]
fn collection_requires_links_and_embedded() {
    let m = materializer();
    assert!(m.materialize_collection(&json!({"_links": {}, "_embedded": {"a": []}}), false).is_none());
    assert!(m
        .materialize_collection(&json!({"_links": {"self": {"href": "x"}}, "_embedded": {}}), false)
        .is_none());
}

#[test]
fn collection_skips_malformed_elements() {
    let payload = json!({
        "_links": {"self": {"href": "http://api/books"}},
        "_embedded": {"books": [book(1), {"title": "no links"}]}
    });
    let collection = materializer().materialize_collection(&payload, false).unwrap();
    assert_eq!(collection.len(), 1);
}

#[test]
fn paged_collection_reads_page_block() {
    let payload = json!({
        "_links": {
            "self": {"href": "http://api/books?page=1&size=2"},
            "first": {"href": "http://api/books?page=0&size=2"},
            "prev": {"href": "http://api/books?page=0&size=2"},
            "next": {"href": "http://api/books?page=2&size=2"},
            "last": {"href": "http://api/books?page=4&size=2"}
        },
        "_embedded": {"books": [book(3), book(4)]},
        "page": {"size": 2, "totalElements": 10, "totalPages": 5, "number": 1}
    });
    let paged = materializer().materialize_paged(&payload, false).unwrap();

    assert_eq!(paged.resources().len(), 2);
    assert_eq!(paged.page_size(), 2);
    assert_eq!(paged.total_elements(), 10);
    assert_eq!(paged.total_pages(), 5);
    assert_eq!(paged.page_number(), 1);
    assert!(paged.has_first() && paged.has_prev() && paged.has_next() && paged.has_last());
    assert_eq!(paged.next_link().unwrap().href, "http://api/books?page=2&size=2");
}

#[test]
fn paged_collection_defaults_without_page_block() {
    let payload = json!({
        "_links": {"self": {"href": "http://api/books"}},
        "_embedded": {"books": [book(1)]}
    });
    let paged = materializer().materialize_paged(&payload, false).unwrap();
    assert_eq!(*paged.page(), PageMetadata::default());
    assert_eq!(paged.page_size(), 20);
    assert_eq!(paged.total_pages(), 1);
    assert!(!paged.has_next());
}

#[test]
fn materialize_dispatches_on_shape() {
    let m = materializer();
    assert!(matches!(m.materialize(&book(1), false), Some(Materialized::Resource(_))));
    assert!(matches!(
        m.materialize(&json!({"count": 1}), false),
        Some(Materialized::Opaque(_))
    ));
}

// ── Typed views ─────────────────────────────────────────────────

#[derive(Debug, Deserialize, PartialEq)]
struct BookView {
    title: String,
}

#[test]
fn deserialize_into_typed_view() {
    let resource = materializer().materialize_resource(&book(9), false).unwrap();
    let view: BookView = resource.deserialize().unwrap();
    assert_eq!(view, BookView { title: "Book 9".to_string() });
}

#[test]
fn to_json_restores_links() {
    let resource = materializer().materialize_resource(&book(1), false).unwrap();
    assert_eq!(resource.to_json(), book(1));
}
