//! Resource URL construction, template filling and proxy rewriting.

use crate::query::{push_sort, QueryParams};
use crate::template::{expand, TemplateVars};
use hateoas_types::{assert_present, HateoasResult, ParamValue, RequestOptions};
use tracing::trace;

/// Builds `base/resource_name[/query]` with exactly one slash between parts.
pub fn resource_url(base: &str, resource_name: &str, query: Option<&str>) -> HateoasResult<String> {
    assert_present(&[("base", &base), ("resourceName", &resource_name)])?;

    let mut url = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        resource_name.trim_matches('/')
    );
    if let Some(query) = query.map(|q| q.trim_start_matches('/')).filter(|q| !q.is_empty()) {
        url.push('/');
        url.push_str(query);
    }
    Ok(url)
}

/// Expands the URI template in `url` with the request options.
///
/// Params, page and size are bound as template variables; `sort` is forced to
/// undefined during expansion and re-added afterwards as one `sort=path,DIR`
/// pair per criterion.
pub fn fill_template(url: &str, options: &RequestOptions) -> HateoasResult<String> {
    assert_present(&[("url", &url)])?;

    let mut vars: TemplateVars = options.params.clone();
    if let Some(page) = options.page {
        vars.insert("page".to_string(), ParamValue::from(page.page));
        vars.insert("size".to_string(), ParamValue::from(page.size));
    }
    vars.insert("sort".to_string(), ParamValue::Null);

    let mut sort = QueryParams::new();
    push_sort(&mut sort, &options.sort);
    let filled = sort.append_to(&expand(url, &vars)?);

    trace!(template = url, url = %filled, "filled url template");
    Ok(filled)
}

/// Clears every template placeholder, leaving the plain URL.
pub fn remove_template_params(url: &str) -> HateoasResult<String> {
    fill_template(url, &RequestOptions::default())
}

/// Rewrites the `root_url` prefix of `url` to `proxy_url` when one is set.
pub fn apply_proxy(url: &str, root_url: &str, proxy_url: Option<&str>) -> HateoasResult<String> {
    assert_present(&[("url", &url), ("rootUrl", &root_url)])?;

    let Some(proxy) = proxy_url
        .map(|p| p.trim_end_matches('/'))
        .filter(|p| !p.is_empty())
    else {
        return Ok(url.to_string());
    };

    let root = root_url.trim_end_matches('/');
    match url.strip_prefix(root) {
        Some(rest) => Ok(format!("{proxy}{rest}")),
        None => Ok(url.to_string()),
    }
}

/// First path segment of `url` below `api_base`, lowercased.
///
/// Returns an empty string when `url` is not under `api_base` or has no
/// segment after it.
pub fn resource_name_from_url(url: &str, api_base: &str) -> String {
    let base = api_base.trim_end_matches('/');
    let (Some(head), Some(rest)) = (url.get(..base.len()), url.get(base.len()..)) else {
        return String::new();
    };
    if base.is_empty() {
        return String::new();
    }

    let at_boundary = rest.is_empty() || rest.starts_with(['/', '?', '#', '{']);
    if !head.eq_ignore_ascii_case(base) || !at_boundary {
        return String::new();
    }

    rest.trim_start_matches('/')
        .split(['/', '?', '{', '#'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Last path segment of `url`, ignoring templates, query and fragment.
pub fn last_segment(url: &str) -> Option<String> {
    let path = url.split(['{', '?', '#']).next().unwrap_or_default();
    let path = path.trim_end_matches('/');
    let (head, segment) = path.rsplit_once('/')?;
    if segment.is_empty() || head.ends_with(":/") {
        return None;
    }
    Some(segment.to_string())
}
