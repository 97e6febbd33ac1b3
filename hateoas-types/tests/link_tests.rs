use hateoas_types::{Link, LinkSet, SELF_RELATION};
use pretty_assertions::assert_eq;
use serde_json::json;

// ── Link ────────────────────────────────────────────────────────

#[test]
fn plain_link_is_not_templated() {
    let link = Link::new("http://api/books/5");
    assert_eq!(link.href, "http://api/books/5");
    assert!(!link.is_templated());
}

#[test]
fn templated_link_flag() {
    let link = Link::templated("http://api/books{?page,size}");
    assert!(link.is_templated());
}

#[test]
fn link_serializes_without_absent_templated_flag() {
    let value = serde_json::to_value(Link::new("http://api/a")).unwrap();
    assert_eq!(value, json!({ "href": "http://api/a" }));
}

// ── LinkSet parsing ─────────────────────────────────────────────

#[test]
fn from_value_reads_relations() {
    let links = LinkSet::from_value(&json!({
        "self": { "href": "http://api/books/5" },
        "author": { "href": "http://api/books/5/author{?projection}", "templated": true }
    }));

    assert_eq!(links.len(), 2);
    assert!(links.contains(SELF_RELATION));
    assert_eq!(links.self_link().unwrap().href, "http://api/books/5");
    assert!(links.get("author").unwrap().is_templated());
}

#[test]
fn from_value_takes_first_link_of_array_relation() {
    let links = LinkSet::from_value(&json!({
        "curies": [{ "href": "http://docs/{rel}" }, { "href": "http://other/{rel}" }]
    }));
    assert_eq!(links.get("curies").unwrap().href, "http://docs/{rel}");
}

#[test]
fn from_value_skips_malformed_entries() {
    let links = LinkSet::from_value(&json!({
        "self": { "href": "http://api/a" },
        "broken": "not a link",
        "empty": []
    }));
    assert_eq!(links.len(), 1);
    assert!(!links.contains("broken"));
}

#[test]
fn from_non_object_is_empty() {
    assert!(LinkSet::from_value(&json!(null)).is_empty());
    assert!(LinkSet::from_value(&json!([1, 2])).is_empty());
}

#[test]
fn to_value_restores_wire_shape() {
    let raw = json!({
        "self": { "href": "http://api/a/1" },
        "items": { "href": "http://api/a/1/items" }
    });
    assert_eq!(LinkSet::from_value(&raw).to_value(), raw);
}

#[test]
fn builder_with_adds_relation() {
    let links = LinkSet::new()
        .with("self", Link::new("http://api/a/1"))
        .with("next", Link::new("http://api/a?page=1"));
    let relations: Vec<&str> = links.relations().collect();
    assert_eq!(relations, vec!["next", "self"]);
}
