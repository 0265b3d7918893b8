//! Outbound HTTP access.
//!
//! Every remote call made by the resolvers goes through the [`HttpClient`]
//! trait so that resolution logic can be exercised against canned
//! responses. [`ReqwestClient`] is the production implementation.
//!
//! A response counts as successful only with a 2xx status; anything else
//! becomes [`NoticeError::HttpStatus`]. Transport failures become
//! [`NoticeError::NetworkError`].

use std::future::Future;

use tracing::debug;

use crate::constants::{GITHUB_API_URL, HTTP_CONNECT_TIMEOUT, HTTP_REQUEST_TIMEOUT};
use crate::core::NoticeError;

/// Minimal asynchronous GET capability used by the resolvers.
pub trait HttpClient: Send + Sync {
    /// Fetch `url` and return the response body as text.
    ///
    /// When `bearer` is set it is sent as an `Authorization: Bearer` header.
    fn get(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> impl Future<Output = Result<String, NoticeError>> + Send;
}

/// [`HttpClient`] backed by a shared `reqwest::Client`.
///
/// Requests below the GitHub API base ask for GitHub's JSON media type.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
    github_api: String,
}

impl ReqwestClient {
    /// Build a client with the crate's user agent and timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(HTTP_REQUEST_TIMEOUT)
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            github_api: GITHUB_API_URL.to_string(),
        })
    }

    /// Use `base` as the GitHub API base URL.
    #[must_use]
    pub fn with_github_api(mut self, base: impl Into<String>) -> Self {
        self.github_api = base.into();
        self
    }

    fn is_github_api(&self, url: &str) -> bool {
        let base = self.github_api.trim_end_matches('/');
        !base.is_empty()
            && url.strip_prefix(base).is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str, bearer: Option<&str>) -> Result<String, NoticeError> {
        debug!("GET {}", url);

        let mut request = self.client.get(url);
        if self.is_github_api(url) {
            request = request.header(reqwest::header::ACCEPT, "application/vnd.github+json");
        }
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| NoticeError::NetworkError {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NoticeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| NoticeError::NetworkError {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
