//! URL construction for the hateoas HAL client.
//!
//! Everything here is a pure function: no I/O, no shared state. The cache and
//! the materializer both depend on these functions producing canonical,
//! comparable output, so malformed input is rejected instead of producing a
//! best-effort URL.
//!
//! - [`resource_url`] builds `base/resource[/query]`
//! - [`fill_template`] expands RFC6570 templates and appends sort criteria
//! - [`to_query_params`] encodes request options as a canonical query
//! - [`apply_proxy`] rewrites the API root to the configured proxy
//! - [`resource_name_from_url`] derives the resource root of a URL

mod builder;
mod query;
mod template;

pub use builder::{
    apply_proxy, fill_template, last_segment, remove_template_params, resource_name_from_url,
    resource_url,
};
pub use query::{to_query_params, QueryParams};
pub use template::{expand, TemplateVars};
