//! Tests for ResourceService reads, writes and shape checks.

use hateoas_client::transport::mock::MockTransport;
use hateoas_client::{HttpMethod, RequestBody, ResourceService};
use hateoas_model::{Materialized, Properties, Property, Resource, TypeRegistry};
use hateoas_types::{ClientConfig, HateoasError, PageParams, RequestOptions};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

fn registry() -> Arc<TypeRegistry> {
    let mut registry = TypeRegistry::new();
    registry
        .register_resource("books", || Resource::new("Book"))
        .register_resource("authors", || Resource::new("Author"));
    registry.freeze()
}

fn service_with(config: ClientConfig) -> (ResourceService, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    let service = ResourceService::new(config, registry(), transport.clone()).unwrap();
    (service, transport)
}

fn service() -> (ResourceService, Arc<MockTransport>) {
    service_with(ClientConfig::new("http://api"))
}

fn book(id: u32) -> Value {
    json!({
        "title": format!("Book {id}"),
        "_links": {
            "self": {"href": format!("http://api/books/{id}")},
            "book": {"href": format!("http://api/books/{id}{{?projection}}"), "templated": true}
        }
    })
}

fn books_page(ids: &[u32]) -> Value {
    let items: Vec<Value> = ids.iter().map(|id| book(*id)).collect();
    json!({
        "_embedded": {"books": items},
        "_links": {"self": {"href": "http://api/books?page=0&size=20"}},
        "page": {"size": 20, "totalElements": ids.len(), "totalPages": 1, "number": 0}
    })
}

// ── Construction ────────────────────────────────────────────────

#[test]
fn invalid_config_is_rejected() {
    let transport = Arc::new(MockTransport::new());
    let err = ResourceService::new(ClientConfig::default(), registry(), transport).unwrap_err();
    assert!(matches!(err, HateoasError::Config(_)));
}

// ── Reads ───────────────────────────────────────────────────────

#[tokio::test]
async fn get_resource_materializes_registered_type() {
    let (service, transport) = service();
    transport.push_json(200, book(1));

    let resource = service
        .get_resource("books", "1", &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(resource.type_name(), "Book");
    assert_eq!(resource.get("title").and_then(Property::as_str), Some("Book 1"));
    assert_eq!(transport.last_request().unwrap().url, "http://api/books/1");
}

#[tokio::test]
async fn get_resource_requires_name_and_id() {
    let (service, transport) = service();
    let err = service
        .get_resource("", "", &RequestOptions::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("'resourceName', 'id'"));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn unexpected_shape_evicts_before_failing() {
    let (service, transport) = service();
    transport.push_json(200, books_page(&[1])).push_json(200, book(1));
    let options = RequestOptions::new();

    let err = service.get_resource("books", "1", &options).await.unwrap_err();
    assert!(matches!(
        err,
        HateoasError::UnexpectedShape { ref expected, ref actual }
            if expected == "Resource" && actual == "PagedResourceCollection"
    ));

    let resource = service.get_resource("books", "1", &options).await.unwrap();
    assert_eq!(resource.self_href(), Some("http://api/books/1"));
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn get_collection_requires_plain_collection() {
    let (service, transport) = service();
    transport.push_json(
        200,
        json!({"_embedded": {"books": [book(1), book(2)]}, "_links": {"self": {"href": "http://api/books"}}}),
    );

    let collection = service
        .get_collection("books", &RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(collection.len(), 2);
}

#[tokio::test]
async fn get_page_uses_default_page() {
    let (service, transport) = service();
    transport.push_json(200, books_page(&[1, 2, 3]));

    let page = service.get_page("books", &RequestOptions::new()).await.unwrap();

    assert_eq!(page.resources().len(), 3);
    assert_eq!(page.total_elements(), 3);
    assert_eq!(
        transport.last_request().unwrap().url,
        "http://api/books?page=0&size=20"
    );
}

#[tokio::test]
async fn explicit_page_overrides_default() {
    let (service, transport) = service();
    transport.push_json(200, books_page(&[]));

    service
        .get_page("books", &RequestOptions::new().page(PageParams::new(3, 5)))
        .await
        .unwrap();
    assert_eq!(
        transport.last_request().unwrap().url,
        "http://api/books?page=3&size=5"
    );
}

#[tokio::test]
async fn search_collection_targets_search_segment() {
    let (service, transport) = service();
    transport.push_json(
        200,
        json!({"_embedded": {"books": [book(1)]}, "_links": {"self": {"href": "http://api/books/search/byTitle"}}}),
    );

    let found = service
        .search_collection("books", "byTitle", &RequestOptions::new().param("title", "X"))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(
        transport.last_request().unwrap().url,
        "http://api/books/search/byTitle?title=X"
    );
}

#[tokio::test]
async fn proxy_replaces_root_in_generated_urls() {
    let (service, transport) =
        service_with(ClientConfig::new("http://api").with_proxy("http://proxy/api"));
    transport.push_json(
        200,
        json!({"_links": {"self": {"href": "http://proxy/api/books/1"}}}),
    );

    let resource = service
        .get_resource("books", "1", &RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(resource.type_name(), "Book");
    assert_eq!(
        transport.last_request().unwrap().url,
        "http://proxy/api/books/1"
    );
}

// ── Writes ──────────────────────────────────────────────────────

#[tokio::test]
async fn create_flattens_resource_fields() {
    let (service, transport) = service();
    transport
        .push_json(200, json!({"_links": {"self": {"href": "http://api/authors/1"}}}))
        .push_json(201, book(7));

    let author = service
        .get_resource("authors", "1", &RequestOptions::new())
        .await
        .unwrap();
    let body = Properties::new()
        .with("title", json!("New"))
        .with("author", author)
        .with("isbn", Value::Null);

    let reply = service
        .create_resource("books", &Property::from(body), &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(reply.status, 201);
    assert_eq!(reply.resource().map(Resource::type_name), Some("Book"));

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url, "http://api/books");
    assert_eq!(
        request.body,
        Some(RequestBody::Json(json!({"title": "New", "author": "http://api/authors/1"})))
    );
}

#[tokio::test]
async fn include_nulls_keeps_null_fields() {
    let (service, transport) = service();
    transport.push_json(201, Value::Null);

    let body = Property::from(json!({"title": "New", "isbn": null}));
    let reply = service
        .create_resource("books", &body, &RequestOptions::new().include_nulls())
        .await
        .unwrap();

    assert_eq!(reply.body, None);
    assert_eq!(
        transport.last_request().unwrap().body,
        Some(RequestBody::Json(json!({"title": "New", "isbn": null})))
    );
}

#[tokio::test]
async fn empty_body_is_rejected() {
    let (service, transport) = service();
    let err = service
        .create_resource("books", &Property::Null, &RequestOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, HateoasError::InvalidParam(_)));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn update_and_patch_target_self_link() {
    let (service, transport) = service();
    transport
        .push_json(200, book(3))
        .push_json(200, book(3))
        .push_json(200, book(3));
    let options = RequestOptions::new();

    let resource = service.get_resource("books", "3", &options).await.unwrap();
    let body = Property::from(json!({"title": "Changed"}));
    service.update_resource(&resource, &body, &options).await.unwrap();
    service.patch_resource(&resource, &body, &options).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[1].method, HttpMethod::Put);
    assert_eq!(requests[1].url, "http://api/books/3");
    assert_eq!(requests[2].method, HttpMethod::Patch);
}

#[tokio::test]
async fn delete_evicts_cached_reads() {
    let (service, transport) = service();
    transport
        .push_json(200, book(4))
        .push_json(204, Value::Null)
        .push_json(200, book(4));
    let options = RequestOptions::new();

    let resource = service.get_resource("books", "4", &options).await.unwrap();
    let reply = service.delete_resource(&resource, &options).await.unwrap();
    assert_eq!(reply.status, 204);
    assert_eq!(reply.body, None);

    service.get_resource("books", "4", &options).await.unwrap();
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test]
async fn delete_by_id_builds_resource_url() {
    let (service, transport) = service();
    transport.push_json(204, Value::Null);

    service
        .delete_resource_by_id("books", "9", &RequestOptions::new())
        .await
        .unwrap();
    let request = transport.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Delete);
    assert_eq!(request.url, "http://api/books/9");
}

#[tokio::test]
async fn write_without_self_link_fails() {
    let (service, _transport) = service();
    let detached = Resource::new("Book");
    let err = service
        .delete_resource(&detached, &RequestOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, HateoasError::MissingRelation(ref rel) if rel == "self"));
}

// ── Custom queries ──────────────────────────────────────────────

#[tokio::test]
async fn custom_query_passes_opaque_payloads_through() {
    let (service, transport) = service();
    transport.push_json(200, json!({"count": 42}));

    let reply = service
        .custom_query("books", HttpMethod::Get, "stats", None, &RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(reply.body, Some(Materialized::Opaque(json!({"count": 42}))));
    assert_eq!(transport.last_request().unwrap().url, "http://api/books/stats");
}

#[tokio::test]
async fn custom_search_query_posts_body() {
    let (service, transport) = service();
    transport.push_json(200, book(1));

    let body = Property::from(json!({"q": "rust"}));
    let reply = service
        .custom_search_query("books", HttpMethod::Post, "find", Some(&body), &RequestOptions::new())
        .await
        .unwrap();

    assert!(reply.resource().is_some());
    let request = transport.last_request().unwrap();
    assert_eq!(request.url, "http://api/books/search/find");
    assert_eq!(request.body, Some(RequestBody::Json(json!({"q": "rust"}))));
}

#[tokio::test]
async fn transport_errors_propagate() {
    let (service, transport) = service();
    transport.push_error(404, "not found");

    let err = service
        .get_resource("books", "404", &RequestOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}
