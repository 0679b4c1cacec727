//! Remote fetcher for punishment comparisons
//!
//! The transport is a trait so the redirect and envelope handling can be
//! tested without sockets. Production code uses [`ReqwestTransport`].

mod client;
mod error;
mod transport;

pub use client::{
    PunishmentClient, SECRET_HEADER, fetch_with_one_redirect, parse_envelope, parse_response,
};
pub use error::{FetchError, FetchResult};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

#[cfg(test)]
pub use transport::MockHttpTransport;
