use hateoas_types::{HateoasResult, ObserveMode, RequestOptions};
use hateoas_url::to_query_params;
use std::fmt;

/// Canonical identity of a cacheable request.
///
/// Equal `(url, options)` pairs always produce equal keys; the order in
/// which params were added does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    url: String,
    value: String,
}

impl CacheKey {
    /// `url=<url>[?<query>][&observe=<mode>]`; the default body mode is
    /// left out, so an explicit `Body` and no mode share a key.
    pub fn of(url: &str, options: &RequestOptions) -> HateoasResult<Self> {
        let mut value = format!("url={url}");

        let query = to_query_params(options)?;
        if !query.is_empty() {
            value.push('?');
            value.push_str(&query.to_string());
        }
        let mode = options.observe_mode();
        if mode != ObserveMode::default() {
            value.push_str("&observe=");
            value.push_str(&mode.to_string());
        }

        Ok(Self {
            url: url.to_string(),
            value,
        })
    }

    /// The request URL the key was built from.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
