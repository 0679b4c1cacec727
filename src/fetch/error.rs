//! Error types for the punishment API client

use thiserror::Error;

/// Errors that can occur while fetching a punishment comparison
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network level failure (DNS, connect, TLS, timeout)
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Final response had a non-2xx status other than 401
    #[error("API request failed with status {0}")]
    HttpStatus(u16),

    /// The API rejected the shared secret
    #[error("Unauthorized: Invalid security code")]
    Unauthorized,

    /// Body was not valid JSON or did not match the expected shape
    #[error("Error parsing JSON response: {0}")]
    Parse(String),

    /// Envelope reported `success: false`
    #[error("API returned error: {0}")]
    Api(String),

    /// Redirect without a usable `Location` header
    #[error("Invalid redirect: {0}")]
    InvalidRedirect(String),

    /// Configured endpoint is not a valid URL
    #[error("Invalid endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Username not available")]
    MissingUsername,
}

impl FetchError {
    /// Wrap any transport failure
    pub fn transport(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(error))
    }

    /// Short machine friendly name used in logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::HttpStatus(_) => "http_status",
            Self::Unauthorized => "unauthorized",
            Self::Parse(_) => "parse",
            Self::Api(_) => "api",
            Self::InvalidRedirect(_) => "invalid_redirect",
            Self::InvalidEndpoint { .. } => "invalid_endpoint",
            Self::MissingUsername => "missing_username",
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;
