//! Transport layer abstraction.
//!
//! The core only hands the transport fully built URLs and already flattened
//! bodies. Connection handling, headers and timeouts belong to the
//! implementation.

use async_trait::async_trait;
use hateoas_types::{HateoasResult, ObserveMode};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// HTTP verbs used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Writes invalidate the cache on success.
    pub fn is_write(self) -> bool {
        self != Self::Get
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            other => Err(format!("unsupported http method '{other}'")),
        }
    }
}

/// A request body, already in wire form.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    /// Newline separated resource hrefs, sent as `text/uri-list`.
    UriList(String),
}

impl RequestBody {
    pub fn uri_list<'a>(hrefs: impl IntoIterator<Item = &'a str>) -> Self {
        Self::UriList(hrefs.into_iter().collect::<Vec<_>>().join("\n"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute URL including the query string.
    pub url: String,
    pub body: Option<RequestBody>,
    pub observe: ObserveMode,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            observe: ObserveMode::Body,
        }
    }

    pub fn with_body(mut self, body: Option<RequestBody>) -> Self {
        self.body = body;
        self
    }

    pub fn with_observe(mut self, observe: ObserveMode) -> Self {
        self.observe = observe;
        self
    }
}

/// A successful response.
///
/// `body` is `Value::Null` for empty responses. `headers` is only filled in
/// [`ObserveMode::Response`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
}

impl HttpResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body,
        }
    }
}

/// Performs a single HTTP exchange.
///
/// Each call produces exactly one response or one error. Non-success
/// statuses are reported as [`hateoas_types::HateoasError::Transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform(&self, request: HttpRequest) -> HateoasResult<HttpResponse>;
}

/// Scripted transport for tests.
pub mod mock {
    use super::*;
    use hateoas_types::HateoasError;
    use std::collections::VecDeque;
    use std::sync::{Mutex, PoisonError};

    /// Replays queued responses in order and records every request.
    #[derive(Debug, Default)]
    pub struct MockTransport {
        responses: Mutex<VecDeque<HateoasResult<HttpResponse>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues a JSON response.
        pub fn push_json(&self, status: u16, body: Value) -> &Self {
            self.push(Ok(HttpResponse::new(status, body)))
        }

        /// Queues a transport failure with the given status.
        pub fn push_error(&self, status: u16, message: impl Into<String>) -> &Self {
            self.push(Err(HateoasError::Transport {
                status: Some(status),
                message: message.into(),
            }))
        }

        pub fn push(&self, response: HateoasResult<HttpResponse>) -> &Self {
            self.responses
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(response);
            self
        }

        /// Every request seen so far, oldest first.
        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        pub fn last_request(&self) -> Option<HttpRequest> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .last()
                .cloned()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn perform(&self, request: HttpRequest) -> HateoasResult<HttpResponse> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request.clone());
            self.responses
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .unwrap_or_else(|| {
                    Err(HateoasError::Transport {
                        status: None,
                        message: format!("no scripted response for {} {}", request.method, request.url),
                    })
                })
        }
    }
}
