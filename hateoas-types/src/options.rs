//! Per-request options: free-form query params, paging, sorting, observe mode.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the query parameter that selects a projection.
const PROJECTION_PARAM: &str = "projection";

/// A query parameter value.
///
/// Scalars are stored in their string form. Resources are carried by their
/// self-link href so the wire stays link-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamValue {
    Null,
    Text(String),
    List(Vec<ParamValue>),
    Resource(String),
}

impl ParamValue {
    /// A reference to a resource, expressed by its self href.
    pub fn resource(self_href: impl Into<String>) -> Self {
        Self::Resource(self_href.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The single string form used in query strings and template expansion.
    /// Lists and nulls have no single form.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Resource(href) => Some(href),
            Self::Null | Self::List(_) => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

macro_rules! param_from_display {
    ($($ty:ty),*) => {
        $(impl From<$ty> for ParamValue {
            fn from(value: $ty) -> Self {
                Self::Text(value.to_string())
            }
        })*
    };
}

param_from_display!(bool, i32, i64, u32, u64, usize, f64);

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Page request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageParams {
    pub page: u32,
    pub size: u32,
}

impl PageParams {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self { page: 0, size: 20 }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("ASC"),
            Self::Desc => f.write_str("DESC"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            other => Err(format!("unknown sort order '{other}'")),
        }
    }
}

/// Ordered sort criteria. Order is significant: the first entry is the
/// primary sort key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort(Vec<(String, SortOrder)>);

impl Sort {
    pub fn by(path: impl Into<String>, order: SortOrder) -> Self {
        Self(vec![(path.into(), order)])
    }

    /// Appends a secondary criterion.
    pub fn and(mut self, path: impl Into<String>, order: SortOrder) -> Self {
        self.0.push((path.into(), order));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SortOrder)> {
        self.0.iter().map(|(path, order)| (path.as_str(), *order))
    }
}

/// What the caller wants back from a request: the body only, or the full
/// response (status plus body).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObserveMode {
    #[default]
    Body,
    Response,
}

impl fmt::Display for ObserveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body => f.write_str("body"),
            Self::Response => f.write_str("response"),
        }
    }
}

/// Options accepted by every read and write operation.
///
/// `params` is keyed by a sorted map, so two option sets built with the same
/// entries in a different order are equal and encode identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub params: BTreeMap<String, ParamValue>,
    pub page: Option<PageParams>,
    pub sort: Sort,
    pub observe: Option<ObserveMode>,
    /// Per-call opt-out of the response cache.
    pub use_cache: bool,
    /// Null handling when flattening a write body.
    pub values: ValuesOption,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            params: BTreeMap::new(),
            page: None,
            sort: Sort::default(),
            observe: None,
            use_cache: true,
            values: ValuesOption::default(),
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn page(mut self, page: PageParams) -> Self {
        self.page = Some(page);
        self
    }

    pub fn sort(mut self, path: impl Into<String>, order: SortOrder) -> Self {
        self.sort = std::mem::take(&mut self.sort).and(path, order);
        self
    }

    pub fn sort_by(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    pub fn observe(mut self, mode: ObserveMode) -> Self {
        self.observe = Some(mode);
        self
    }

    /// Requests a named projection of the resource.
    pub fn projection(self, name: impl Into<String>) -> Self {
        self.param(PROJECTION_PARAM, name.into())
    }

    pub fn use_cache(mut self, enabled: bool) -> Self {
        self.use_cache = enabled;
        self
    }

    /// Sends explicit nulls in write bodies instead of dropping them.
    pub fn include_nulls(mut self) -> Self {
        self.values = ValuesOption::include_nulls();
        self
    }

    /// Copy without params, paging and sort, for URLs that already carry
    /// their query.
    pub fn without_query(&self) -> Self {
        Self {
            observe: self.observe,
            use_cache: self.use_cache,
            values: self.values,
            ..Self::default()
        }
    }

    pub fn is_projection(&self) -> bool {
        self.params
            .get(PROJECTION_PARAM)
            .is_some_and(|value| !value.is_null())
    }

    pub fn observe_mode(&self) -> ObserveMode {
        self.observe.unwrap_or_default()
    }
}

/// How write-body flattening treats null fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValuesOption {
    /// Keep explicit nulls instead of dropping the key.
    pub include_nulls: bool,
}

impl ValuesOption {
    pub fn include_nulls() -> Self {
        Self {
            include_nulls: true,
        }
    }
}
