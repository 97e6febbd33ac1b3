//! Caller-facing resource operations.

use crate::executor::HttpExecutor;
use crate::http::ReqwestTransport;
use crate::transport::{HttpMethod, HttpResponse, RequestBody, Transport};
use hateoas_cache::CacheStore;
use hateoas_model::{
    classify, resolve_values, Materialized, PagedResourceCollection, PayloadKind, Property,
    Resource, ResourceCollection, ResourceMaterializer, TypeRegistry,
};
use hateoas_types::{
    assert_present, ClientConfig, HateoasError, HateoasResult, LinkSet, RequestOptions,
    SELF_RELATION,
};
use hateoas_url::{apply_proxy, remove_template_params, resource_url};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

const SEARCH_SEGMENT: &str = "search";

/// Outcome of a write or custom query.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    /// Response headers, filled only in response observe mode.
    pub headers: BTreeMap<String, String>,
    /// `None` when the response had no body.
    pub body: Option<Materialized>,
}

impl Reply {
    pub fn resource(&self) -> Option<&Resource> {
        match &self.body {
            Some(Materialized::Resource(resource)) => Some(resource),
            _ => None,
        }
    }

    pub fn into_resource(self) -> Option<Resource> {
        match self.body {
            Some(Materialized::Resource(resource)) => Some(resource),
            _ => None,
        }
    }
}

/// Reads, searches and writes resources of a HAL API.
///
/// Every GET checks the payload shape against what the operation expects;
/// a mismatch evicts the cached entry before the error is returned so the
/// bad payload is never replayed.
#[derive(Debug)]
pub struct ResourceService {
    config: ClientConfig,
    executor: HttpExecutor,
    materializer: ResourceMaterializer,
}

impl ResourceService {
    pub fn new(
        config: ClientConfig,
        registry: Arc<TypeRegistry>,
        transport: Arc<dyn Transport>,
    ) -> HateoasResult<Self> {
        config.validate()?;
        let cache = CacheStore::from_config(&config);
        let materializer = ResourceMaterializer::new(registry, &config);
        Ok(Self {
            executor: HttpExecutor::new(transport, cache),
            materializer,
            config,
        })
    }

    /// Builds a service over a [`ReqwestTransport`].
    pub fn connect(config: ClientConfig, registry: Arc<TypeRegistry>) -> HateoasResult<Self> {
        let transport = ReqwestTransport::new(&config.http)?;
        Self::new(config, registry, Arc::new(transport))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn executor(&self) -> &HttpExecutor {
        &self.executor
    }

    pub fn materializer(&self) -> &ResourceMaterializer {
        &self.materializer
    }

    /// Materializes an arbitrary payload with the service's registry.
    pub fn materialize(&self, payload: &Value, projection: bool) -> Option<Materialized> {
        self.materializer.materialize(payload, projection)
    }

    pub fn evict_all(&self) {
        self.executor.evict_all();
    }

    // ── Reads ───────────────────────────────────────────────────

    pub async fn get_resource(
        &self,
        resource_name: &str,
        id: &str,
        options: &RequestOptions,
    ) -> HateoasResult<Resource> {
        assert_present(&[("resourceName", &resource_name), ("id", &id)])?;
        let url = resource_url(self.base(), resource_name, Some(id))?;
        self.fetch_resource(&url, options, options.is_projection()).await
    }

    pub async fn get_collection(
        &self,
        resource_name: &str,
        options: &RequestOptions,
    ) -> HateoasResult<ResourceCollection> {
        let url = resource_url(self.base(), resource_name, None)?;
        self.fetch_collection(&url, options, options.is_projection())
            .await
    }

    /// Fetches one page; the configured default page is used when `options`
    /// has none.
    pub async fn get_page(
        &self,
        resource_name: &str,
        options: &RequestOptions,
    ) -> HateoasResult<PagedResourceCollection> {
        let url = resource_url(self.base(), resource_name, None)?;
        let options = self.with_default_page(options);
        self.fetch_page(&url, &options, options.is_projection()).await
    }

    // ── Search ──────────────────────────────────────────────────

    pub async fn search_resource(
        &self,
        resource_name: &str,
        query: &str,
        options: &RequestOptions,
    ) -> HateoasResult<Resource> {
        let url = self.search_url(resource_name, query)?;
        self.fetch_resource(&url, options, options.is_projection()).await
    }

    pub async fn search_collection(
        &self,
        resource_name: &str,
        query: &str,
        options: &RequestOptions,
    ) -> HateoasResult<ResourceCollection> {
        let url = self.search_url(resource_name, query)?;
        self.fetch_collection(&url, options, options.is_projection())
            .await
    }

    pub async fn search_page(
        &self,
        resource_name: &str,
        query: &str,
        options: &RequestOptions,
    ) -> HateoasResult<PagedResourceCollection> {
        let url = self.search_url(resource_name, query)?;
        let options = self.with_default_page(options);
        self.fetch_page(&url, &options, options.is_projection()).await
    }

    // ── Writes ──────────────────────────────────────────────────

    /// POSTs `body` to the resource collection.
    pub async fn create_resource(
        &self,
        resource_name: &str,
        body: &Property,
        options: &RequestOptions,
    ) -> HateoasResult<Reply> {
        let url = resource_url(self.base(), resource_name, None)?;
        let body = required_body(body, options)?;
        let response = self.executor.post(&url, Some(body), options).await?;
        Ok(self.reply(response, options))
    }

    /// PUTs `body` to the resource's self link, replacing it.
    pub async fn update_resource(
        &self,
        resource: &Resource,
        body: &Property,
        options: &RequestOptions,
    ) -> HateoasResult<Reply> {
        let url = self.self_url(resource)?;
        let body = required_body(body, options)?;
        let response = self.executor.put(&url, Some(body), options).await?;
        Ok(self.reply(response, options))
    }

    /// PATCHes `body` onto the resource's self link.
    pub async fn patch_resource(
        &self,
        resource: &Resource,
        body: &Property,
        options: &RequestOptions,
    ) -> HateoasResult<Reply> {
        let url = self.self_url(resource)?;
        let body = required_body(body, options)?;
        let response = self.executor.patch(&url, Some(body), options).await?;
        Ok(self.reply(response, options))
    }

    pub async fn delete_resource(
        &self,
        resource: &Resource,
        options: &RequestOptions,
    ) -> HateoasResult<Reply> {
        let url = self.self_url(resource)?;
        let response = self.executor.delete(&url, options).await?;
        Ok(self.reply(response, options))
    }

    pub async fn delete_resource_by_id(
        &self,
        resource_name: &str,
        id: &str,
        options: &RequestOptions,
    ) -> HateoasResult<Reply> {
        assert_present(&[("resourceName", &resource_name), ("id", &id)])?;
        let url = resource_url(self.base(), resource_name, Some(id))?;
        let response = self.executor.delete(&url, options).await?;
        Ok(self.reply(response, options))
    }

    // ── Custom queries ──────────────────────────────────────────

    /// Runs `method` against `base/resource_name/query`. The result is
    /// materialized when it has HAL structure and passed through otherwise.
    pub async fn custom_query(
        &self,
        resource_name: &str,
        method: HttpMethod,
        query: &str,
        body: Option<&Property>,
        options: &RequestOptions,
    ) -> HateoasResult<Reply> {
        assert_present(&[("query", &query)])?;
        let url = resource_url(self.base(), resource_name, Some(query))?;
        self.custom(method, &url, body, options).await
    }

    /// Like [`Self::custom_query`] below the `search` segment.
    pub async fn custom_search_query(
        &self,
        resource_name: &str,
        method: HttpMethod,
        query: &str,
        body: Option<&Property>,
        options: &RequestOptions,
    ) -> HateoasResult<Reply> {
        let url = self.search_url(resource_name, query)?;
        self.custom(method, &url, body, options).await
    }

    async fn custom(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&Property>,
        options: &RequestOptions,
    ) -> HateoasResult<Reply> {
        let body = body
            .and_then(|body| resolve_values(body, options.values))
            .map(RequestBody::Json);
        let response = self.executor.execute(method, url, body, options).await?;
        Ok(self.reply(response, options))
    }

    // ── Shared plumbing ─────────────────────────────────────────

    pub(crate) fn base(&self) -> &str {
        self.config.effective_base()
    }

    /// Rewrites an API href to the proxy when one is configured.
    pub(crate) fn proxied(&self, href: &str) -> HateoasResult<String> {
        apply_proxy(href, self.config.root_url(), self.config.proxy())
    }

    /// Self href with templates cleared and the proxy applied.
    pub(crate) fn self_url(&self, resource: &Resource) -> HateoasResult<String> {
        let href = resource
            .self_href()
            .ok_or_else(|| HateoasError::MissingRelation(SELF_RELATION.to_string()))?;
        self.proxied(&remove_template_params(href)?)
    }

    pub(crate) fn with_default_page(&self, options: &RequestOptions) -> RequestOptions {
        match options.page {
            Some(_) => options.clone(),
            None => options.clone().page(self.config.default_page),
        }
    }

    pub(crate) async fn fetch_resource(
        &self,
        url: &str,
        options: &RequestOptions,
        projection: bool,
    ) -> HateoasResult<Resource> {
        let body = self.fetch_expected(url, options, PayloadKind::Resource).await?;
        self.materializer
            .materialize_resource(&body, projection)
            .ok_or_else(|| unexpected(PayloadKind::Resource, PayloadKind::Opaque))
    }

    pub(crate) async fn fetch_collection(
        &self,
        url: &str,
        options: &RequestOptions,
        projection: bool,
    ) -> HateoasResult<ResourceCollection> {
        let expected = PayloadKind::ResourceCollection;
        let body = self.fetch_expected(url, options, expected).await?;
        match self.materializer.materialize_collection(&body, projection) {
            Some(collection) => Ok(collection),
            // `_embedded` present but empty: an empty collection, not an error.
            None => Ok(ResourceCollection::new(
                LinkSet::from_value(&body["_links"]),
                Vec::new(),
            )),
        }
    }

    pub(crate) async fn fetch_page(
        &self,
        url: &str,
        options: &RequestOptions,
        projection: bool,
    ) -> HateoasResult<PagedResourceCollection> {
        let expected = PayloadKind::PagedResourceCollection;
        let body = self.fetch_expected(url, options, expected).await?;
        match self.materializer.materialize_paged(&body, projection) {
            Some(paged) => Ok(paged),
            None => {
                let page = serde_json::from_value(body["page"].clone()).unwrap_or_default();
                let links = LinkSet::from_value(&body["_links"]);
                Ok(PagedResourceCollection::new(
                    ResourceCollection::new(links, Vec::new()),
                    page,
                ))
            }
        }
    }

    /// GETs `url` and checks the payload classifies as `expected`.
    async fn fetch_expected(
        &self,
        url: &str,
        options: &RequestOptions,
        expected: PayloadKind,
    ) -> HateoasResult<Value> {
        let response = self.executor.get(url, options).await?;
        let actual = classify(&response.body);
        if actual != expected {
            warn!(url, %expected, %actual, "unexpected payload shape");
            self.executor.evict(url, options)?;
            return Err(unexpected(expected, actual));
        }
        Ok(response.body)
    }

    fn search_url(&self, resource_name: &str, query: &str) -> HateoasResult<String> {
        assert_present(&[("resourceName", &resource_name), ("query", &query)])?;
        let query = format!("{SEARCH_SEGMENT}/{}", query.trim_start_matches('/'));
        resource_url(self.base(), resource_name, Some(&query))
    }

    pub(crate) fn reply(&self, response: HttpResponse, options: &RequestOptions) -> Reply {
        let HttpResponse {
            status,
            headers,
            body,
        } = response;
        let body = match body {
            Value::Null => None,
            body => Some(
                self.materializer
                    .materialize(&body, options.is_projection())
                    .unwrap_or(Materialized::Opaque(body)),
            ),
        };
        Reply {
            status,
            headers,
            body,
        }
    }
}

fn required_body(body: &Property, options: &RequestOptions) -> HateoasResult<RequestBody> {
    let resolved = resolve_values(body, options.values);
    assert_present(&[("body", &resolved)])?;
    Ok(RequestBody::Json(resolved.unwrap_or(Value::Null)))
}

fn unexpected(expected: PayloadKind, actual: PayloadKind) -> HateoasError {
    HateoasError::UnexpectedShape {
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}
