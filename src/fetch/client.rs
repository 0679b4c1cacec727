//! Punishment comparison client
//!
//! Issues the comparison request, follows at most one redirect, and unwraps
//! the `{ success, result, error }` envelope.

use crate::config::ApiConfig;
use crate::fetch::{
    FetchError, FetchResult, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport,
};
use crate::model::{ApiEnvelope, PunishmentComparison};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Header carrying the shared secret
pub const SECRET_HEADER: &str = "X-Secret-Key";

const REDIRECT_STATUSES: [u16; 4] = [301, 302, 307, 308];
const UNKNOWN_API_ERROR: &str = "Unknown error";

/// Client for the timesheet punishment comparison endpoint
#[derive(Clone)]
pub struct PunishmentClient {
    transport: Arc<dyn HttpTransport>,
    config: ApiConfig,
}

impl std::fmt::Debug for PunishmentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PunishmentClient")
            .field("endpoint", &self.config.endpoint)
            .field("client_id", &self.config.client_id)
            .field("timeout_secs", &self.config.timeout_secs)
            .field("accept_invalid_certs", &self.config.accept_invalid_certs)
            .finish_non_exhaustive()
    }
}

impl PunishmentClient {
    /// Create a client backed by `reqwest`
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Transport` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> FetchResult<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client on top of an arbitrary transport
    #[must_use]
    pub fn with_transport(config: ApiConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport, config }
    }

    /// Settings the client was built with
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Endpoint URL with `username` escaped into the query string
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidEndpoint` if the configured endpoint is not a URL.
    pub fn comparison_url(&self, username: &str) -> FetchResult<Url> {
        let mut url =
            Url::parse(&self.config.endpoint).map_err(|source| FetchError::InvalidEndpoint {
                endpoint: self.config.endpoint.clone(),
                source,
            })?;
        url.query_pairs_mut().append_pair("username", username);
        Ok(url)
    }

    fn build_request(&self, url: Url) -> HttpRequest {
        HttpRequest {
            url,
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                (SECRET_HEADER.to_string(), self.config.secret.clone()),
                ("User-Agent".to_string(), self.config.client_id.clone()),
            ],
        }
    }

    /// Fetch this month's punishment comparison for `username`
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` describing the first thing that went wrong:
    /// an empty username, a transport failure, an unexpected status, a
    /// malformed body, or an envelope with `success: false`.
    pub async fn fetch_comparison(&self, username: &str) -> FetchResult<PunishmentComparison> {
        if username.trim().is_empty() {
            return Err(FetchError::MissingUsername);
        }

        let request = self.build_request(self.comparison_url(username)?);
        debug!(
            target: crate::FETCH_TARGET,
            url = %request.url,
            client_id = request.header("User-Agent").unwrap_or_default(),
            "Fetching punishment comparison"
        );

        let result = fetch_with_one_redirect(self.transport.as_ref(), request)
            .await
            .and_then(|response| {
                debug!(
                    target: crate::FETCH_TARGET,
                    status = response.status,
                    "Received final response"
                );
                parse_response(&response)
            });

        match &result {
            Ok(comparison) => info!(
                target: crate::FETCH_TARGET,
                username = %username,
                month = comparison.month,
                year = comparison.year,
                details = comparison.punishment_details.len(),
                "Fetched punishment comparison"
            ),
            Err(e) => warn!(
                target: crate::FETCH_TARGET,
                username = %username,
                kind = e.kind(),
                error = %e,
                "Failed to fetch punishment comparison"
            ),
        }

        result
    }
}

fn is_redirect(status: u16) -> bool {
    REDIRECT_STATUSES.contains(&status)
}

/// Perform `request`, following a single redirect if the first response asks for one
///
/// The redirect target is requested with the same headers. Whatever comes back
/// from it is returned as is, even if it is another redirect.
///
/// # Errors
///
/// Returns `FetchError::InvalidRedirect` when a redirect has no usable
/// `Location`, or whatever error the transport reports.
pub async fn fetch_with_one_redirect(
    transport: &dyn HttpTransport,
    request: HttpRequest,
) -> FetchResult<HttpResponse> {
    let response = transport.request(&request).await?;
    if !is_redirect(response.status) {
        return Ok(response);
    }

    let status = response.status;
    let location = response.location.as_deref().ok_or_else(|| {
        FetchError::InvalidRedirect(format!("status {status} without Location header"))
    })?;
    let target = request
        .url
        .join(location)
        .map_err(|e| FetchError::InvalidRedirect(format!("{location:?}: {e}")))?;

    info!(
        target: crate::FETCH_TARGET,
        status = status,
        location = %target,
        "Following redirect"
    );

    let follow_up = HttpRequest {
        url: target,
        ..request
    };
    transport.request(&follow_up).await
}

/// Map a final response to the comparison it carries
///
/// # Errors
///
/// `Unauthorized` for 401, `HttpStatus` for other non-2xx statuses, otherwise
/// whatever [`parse_envelope`] reports.
pub fn parse_response(response: &HttpResponse) -> FetchResult<PunishmentComparison> {
    match response.status {
        200..=299 => parse_envelope(&response.body),
        401 => Err(FetchError::Unauthorized),
        status => Err(FetchError::HttpStatus(status)),
    }
}

/// Unwrap the API envelope
///
/// # Errors
///
/// `Parse` if the body is not JSON or the result is missing or malformed,
/// `Api` if the envelope is not successful.
pub fn parse_envelope(body: &str) -> FetchResult<PunishmentComparison> {
    let envelope: ApiEnvelope = serde_json::from_str(body)?;

    if !envelope.is_success() {
        let message = envelope.error_message().unwrap_or(UNKNOWN_API_ERROR);
        return Err(FetchError::Api(message.to_string()));
    }

    let result = envelope
        .result
        .filter(|value| !value.is_null())
        .ok_or_else(|| FetchError::Parse("missing field `result`".to_string()))?;
    Ok(serde_json::from_value(result)?)
}
