//! Per-call request coordination.
//!
//! Reads go through `CacheCheck → Dispatch → Classify → CacheUpdate`; a hit
//! short-circuits the transport. Writes dispatch and, on success only, evict
//! the resource root they touched.

use crate::transport::{HttpMethod, HttpRequest, HttpResponse, RequestBody, Transport};
use hateoas_cache::{CacheKey, CacheStore};
use hateoas_model::classify;
use hateoas_types::{HateoasResult, RequestOptions};
use hateoas_url::to_query_params;
use std::sync::Arc;
use tracing::{debug, info};

pub struct HttpExecutor {
    transport: Arc<dyn Transport>,
    cache: Option<CacheStore>,
}

impl std::fmt::Debug for HttpExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpExecutor")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl HttpExecutor {
    /// `cache` is `None` when caching is disabled.
    pub fn new(transport: Arc<dyn Transport>, cache: Option<CacheStore>) -> Self {
        Self { transport, cache }
    }

    pub fn cache(&self) -> Option<&CacheStore> {
        self.cache.as_ref()
    }

    /// GET `url` with `options` encoded as its query.
    ///
    /// Cached payloads are replayed with status 200. Only link-bearing
    /// payloads are stored.
    pub async fn get(&self, url: &str, options: &RequestOptions) -> HateoasResult<HttpResponse> {
        let key = CacheKey::of(url, options)?;
        let cache = self.cache.as_ref().filter(|_| options.use_cache);

        if let Some(cache) = cache
            && let Some(body) = cache.get(&key)
        {
            return Ok(HttpResponse::new(200, body));
        }
        debug!(key = %key, "cache miss, dispatching");

        let response = self.dispatch(HttpMethod::Get, url, None, options).await?;

        if let Some(cache) = cache {
            let kind = classify(&response.body);
            if kind.is_link_bearing() {
                cache.put(&key, response.body.clone());
            } else {
                debug!(key = %key, %kind, "not caching opaque payload");
            }
        }
        Ok(response)
    }

    pub async fn post(
        &self,
        url: &str,
        body: Option<RequestBody>,
        options: &RequestOptions,
    ) -> HateoasResult<HttpResponse> {
        self.write(HttpMethod::Post, url, body, options).await
    }

    pub async fn put(
        &self,
        url: &str,
        body: Option<RequestBody>,
        options: &RequestOptions,
    ) -> HateoasResult<HttpResponse> {
        self.write(HttpMethod::Put, url, body, options).await
    }

    pub async fn patch(
        &self,
        url: &str,
        body: Option<RequestBody>,
        options: &RequestOptions,
    ) -> HateoasResult<HttpResponse> {
        self.write(HttpMethod::Patch, url, body, options).await
    }

    pub async fn delete(&self, url: &str, options: &RequestOptions) -> HateoasResult<HttpResponse> {
        self.write(HttpMethod::Delete, url, None, options).await
    }

    /// Dispatches any method; GET goes through the cache.
    pub async fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<RequestBody>,
        options: &RequestOptions,
    ) -> HateoasResult<HttpResponse> {
        match method {
            HttpMethod::Get => self.get(url, options).await,
            write => self.write(write, url, body, options).await,
        }
    }

    /// Evicts the resource root of `url`. No-op without a cache.
    pub fn evict(&self, url: &str, options: &RequestOptions) -> HateoasResult<()> {
        if let Some(cache) = &self.cache {
            cache.evict(&CacheKey::of(url, options)?);
        }
        Ok(())
    }

    pub fn evict_all(&self) {
        if let Some(cache) = &self.cache {
            cache.evict_all();
        }
    }

    async fn write(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<RequestBody>,
        options: &RequestOptions,
    ) -> HateoasResult<HttpResponse> {
        let key = CacheKey::of(url, options)?;
        let response = self.dispatch(method, url, body, options).await?;

        if let Some(cache) = &self.cache {
            cache.evict(&key);
        }
        info!(%method, url, status = response.status, "write completed");
        Ok(response)
    }

    async fn dispatch(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<RequestBody>,
        options: &RequestOptions,
    ) -> HateoasResult<HttpResponse> {
        let full_url = to_query_params(options)?.append_to(url);
        debug!(%method, url = %full_url, "dispatching request");

        let request = HttpRequest::new(method, full_url)
            .with_body(body)
            .with_observe(options.observe_mode());
        self.transport.perform(request).await
    }
}
