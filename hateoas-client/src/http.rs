//! `reqwest` based transport.

use crate::transport::{HttpMethod, HttpRequest, HttpResponse, RequestBody, Transport};
use async_trait::async_trait;
use hateoas_types::{HateoasError, HateoasResult, HttpConfig, ObserveMode};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const HAL_JSON: &str = "application/hal+json, application/json";
const URI_LIST: &str = "text/uri-list";

fn transport_error(message: String) -> HateoasError {
    HateoasError::Transport {
        status: None,
        message,
    }
}

/// HTTP transport over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &HttpConfig) -> HateoasResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| transport_error(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wraps an existing client, e.g. one with default auth headers.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn perform(&self, request: HttpRequest) -> HateoasResult<HttpResponse> {
        let mut builder = self
            .client
            .request(method(request.method), &request.url)
            .header(ACCEPT, HAL_JSON);

        builder = match request.body {
            Some(RequestBody::Json(body)) => builder.json(&body),
            Some(RequestBody::UriList(list)) => builder.header(CONTENT_TYPE, URI_LIST).body(list),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            transport_error(format!("{} {} failed: {e}", request.method, request.url))
        })?;

        let status = response.status();
        let headers = if request.observe == ObserveMode::Response {
            response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    Some((name.as_str().to_string(), value.to_str().ok()?.to_string()))
                })
                .collect()
        } else {
            Default::default()
        };

        let text = response.text().await.map_err(|e| {
            transport_error(format!("failed to read response from {}: {e}", request.url))
        })?;

        if !status.is_success() {
            return Err(HateoasError::Transport {
                status: Some(status.as_u16()),
                message: format!("{} {} returned {status}: {text}", request.method, request.url),
            });
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        debug!(method = %request.method, url = %request.url, status = status.as_u16(), "http exchange");
        Ok(HttpResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}
