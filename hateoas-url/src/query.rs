//! Canonical query-string encoding of [`RequestOptions`].

use hateoas_types::{HateoasError, HateoasResult, ParamValue, RequestOptions, Sort};
use std::fmt;

const PAGE_PARAM: &str = "page";
const SIZE_PARAM: &str = "size";
const SORT_PARAM: &str = "sort";

/// An ordered list of encoded-on-display query pairs.
///
/// Free-form params come first in key order, then `page`/`size`, then one
/// `sort` entry per criterion. Two option sets with the same content always
/// produce the same sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All values recorded for `key`, in order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Appends the encoded query to `url`, using `&` when it already has one.
    pub fn append_to(&self, url: &str) -> String {
        if self.is_empty() {
            return url.to_string();
        }
        let separator = query_separator(url);
        format!("{url}{separator}{self}")
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (key, value)) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("&")?;
            }
            write!(
                f,
                "{}={}",
                urlencoding::encode(key),
                encode_value(value)
            )?;
        }
        Ok(())
    }
}

/// Percent-encodes a query value, keeping `,` literal so sort criteria read
/// `sort=path,DIR` on every path that emits them.
fn encode_value(value: &str) -> String {
    urlencoding::encode(value).replace("%2C", ",")
}

/// Separator to use when appending a query to `url`.
fn query_separator(url: &str) -> &'static str {
    match url.find('?') {
        None => "?",
        Some(_) if url.ends_with('?') || url.ends_with('&') => "",
        Some(_) => "&",
    }
}

/// Pushes one `sort=path,DIRECTION` pair per criterion.
pub(crate) fn push_sort(query: &mut QueryParams, sort: &Sort) {
    for (path, order) in sort.iter() {
        query.push(SORT_PARAM, format!("{path},{order}"));
    }
}

/// Encodes request options as query parameters.
///
/// Resources contribute their self href, lists contribute one pair per
/// element, nulls are skipped. Paging must travel through
/// [`RequestOptions::page`]: a literal `page` or `size` key among the
/// free-form params is rejected.
pub fn to_query_params(options: &RequestOptions) -> HateoasResult<QueryParams> {
    if options.params.contains_key(PAGE_PARAM) || options.params.contains_key(SIZE_PARAM) {
        return Err(HateoasError::invalid_param(
            "page and size must be passed through page params, not the params object",
        ));
    }

    let mut query = QueryParams::new();
    for (key, value) in &options.params {
        push_value(&mut query, key, value);
    }

    if let Some(page) = options.page {
        query.push(PAGE_PARAM, page.page.to_string());
        query.push(SIZE_PARAM, page.size.to_string());
    }

    push_sort(&mut query, &options.sort);

    Ok(query)
}

fn push_value(query: &mut QueryParams, key: &str, value: &ParamValue) {
    match value {
        ParamValue::Null => {}
        ParamValue::Text(text) | ParamValue::Resource(text) => query.push(key, text.clone()),
        ParamValue::List(items) => {
            for item in items {
                push_value(query, key, item);
            }
        }
    }
}
