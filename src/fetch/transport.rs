//! HTTP transport used by the punishment client
//!
//! The client only talks to the network through [`HttpTransport`], so the
//! redirect and status handling can be exercised against a mock.

use crate::config::ApiConfig;
use crate::fetch::{FetchError, FetchResult};
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use tracing::warn;
use url::Url;

/// A single outbound GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Value of the first header named `name`, compared case-insensitively
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// What the client needs from a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// `Location` header, if any
    pub location: Option<String>,
    pub body: String,
}

/// Something that can perform a GET request without following redirects
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform the request and return the raw response
    ///
    /// Implementations must not follow redirects themselves.
    async fn request(&self, request: &HttpRequest) -> FetchResult<HttpResponse>;
}

/// `reqwest` backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with redirects disabled and the configured timeout
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Transport` if the TLS backend cannot be initialized.
    pub fn new(config: &ApiConfig) -> FetchResult<Self> {
        if config.accept_invalid_certs {
            warn!(
                target: crate::FETCH_TARGET,
                endpoint = %config.endpoint,
                "TLS certificate validation is disabled for the punishment API"
            );
        }

        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(config.timeout())
            .build()
            .map_err(FetchError::transport)?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn request(&self, request: &HttpRequest) -> FetchResult<HttpResponse> {
        let mut builder = self.client.get(request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(FetchError::transport)?;
        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await.map_err(FetchError::transport)?;

        Ok(HttpResponse {
            status,
            location,
            body,
        })
    }
}
