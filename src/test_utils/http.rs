//! In-memory HTTP client for tests.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::core::NoticeError;
use crate::http::HttpClient;

#[derive(Debug, Clone)]
enum MockResponse {
    Body(String),
    Status(u16),
    NetworkFailure,
}

/// A request observed by [`MockHttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Requested URL
    pub url: String,
    /// Bearer token sent with the request
    pub bearer: Option<String>,
}

/// [`HttpClient`] serving canned responses.
///
/// URLs without a registered response answer with HTTP 404. Every request,
/// answered or not, is recorded in call order.
#[derive(Debug, Default)]
pub struct MockHttpClient {
    responses: HashMap<String, MockResponse>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockHttpClient {
    /// Create a client with no registered responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with a 200 response carrying `body`.
    #[must_use]
    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses.insert(url.into(), MockResponse::Body(body.into()));
        self
    }

    /// Answer `url` with a 200 response carrying `value` serialized as JSON.
    #[must_use]
    pub fn with_json(self, url: impl Into<String>, value: &serde_json::Value) -> Self {
        self.with_body(url, value.to_string())
    }

    /// Answer `url` with the given non-success status.
    #[must_use]
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), MockResponse::Status(status));
        self
    }

    /// Fail requests to `url` at the transport level.
    #[must_use]
    pub fn with_network_failure(mut self, url: impl Into<String>) -> Self {
        self.responses.insert(url.into(), MockResponse::NetworkFailure);
        self
    }

    /// URLs requested so far, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.recorded().into_iter().map(|r| r.url).collect()
    }

    /// Requests observed so far, including bearer tokens.
    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Whether `url` was requested at least once.
    pub fn was_requested(&self, url: &str) -> bool {
        self.requests().iter().any(|u| u == url)
    }

    /// Whether any requested URL contains `fragment`.
    pub fn requested_containing(&self, fragment: &str) -> bool {
        self.requests().iter().any(|u| u.contains(fragment))
    }
}

impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, bearer: Option<&str>) -> Result<String, NoticeError> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(RecordedRequest {
            url: url.to_string(),
            bearer: bearer.map(str::to_string),
        });

        match self.responses.get(url) {
            Some(MockResponse::Body(body)) => Ok(body.clone()),
            Some(MockResponse::Status(status)) => Err(NoticeError::HttpStatus {
                url: url.to_string(),
                status: *status,
            }),
            Some(MockResponse::NetworkFailure) => Err(NoticeError::NetworkError {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            }),
            None => Err(NoticeError::HttpStatus {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
