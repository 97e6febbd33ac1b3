use hateoas_types::{assert_present, HateoasError, ParamValue};
use serde_json::json;

#[test]
fn all_present_passes() {
    let name = "books";
    let id = Some("5".to_string());
    assert!(assert_present(&[("name", &name), ("id", &id)]).is_ok());
}

#[test]
fn reports_every_missing_param_at_once() {
    let name = "  ";
    let id: Option<String> = None;
    let body = json!(null);
    let page = 3u32;

    let err = assert_present(&[("name", &name), ("id", &id), ("body", &body), ("page", &page)])
        .unwrap_err();

    match err {
        HateoasError::InvalidParam(message) => {
            assert!(message.contains("'name'"));
            assert!(message.contains("'id'"));
            assert!(message.contains("'body'"));
            assert!(!message.contains("'page'"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_containers_are_missing() {
    let items: Vec<u32> = Vec::new();
    let object = json!({});
    let list = ParamValue::List(vec![]);
    assert!(assert_present(&[("items", &items)]).is_err());
    assert!(assert_present(&[("object", &object)]).is_err());
    assert!(assert_present(&[("list", &list)]).is_err());
}

#[test]
fn false_and_zero_are_present() {
    let flag = false;
    let number = json!(0);
    assert!(assert_present(&[("flag", &flag), ("number", &number)]).is_ok());
}
