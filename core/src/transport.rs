//! Blocking execution of `HttpRequest` values.
//!
//! # Design
//! `Transport` is the seam between the pure build/parse core and the
//! network. `UreqTransport` is the default; tests substitute their own
//! implementation to observe requests without a server.

use tracing::trace;

use crate::error::FeedError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes a single GET and returns the response as plain data.
///
/// Implementations must hand back non-2xx statuses as data rather than
/// errors; status interpretation belongs to `FeedClient`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, FeedError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, FeedError> {
        (**self).execute(request)
    }
}

/// `Transport` backed by a `ureq::Agent`.
///
/// No timeout, retry or redirect policy is configured beyond ureq's
/// defaults.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, FeedError> {
        let mut builder = self.agent.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder
            .call()
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        trace!(url = %request.url, status, bytes = body.len(), "response received");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
