//! Error types for the feed client.
//!
//! # Design
//! `InvalidArgument` is raised before any request is built, so callers can
//! rely on "no network call happened" when they see it. Non-2xx responses
//! land in `HttpError` with the raw status code and body for debugging.
//! Parse failures keep the parser's message and are never retried.

use thiserror::Error;

/// Errors returned by `FeedClient` queries and their `parse_*` halves.
#[derive(Debug, Error)]
pub enum FeedError {
    /// A required argument (the run id of a per-run query) was missing.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The HTTP layer failed before a response was received.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The service returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The body of an XML feed could not be parsed.
    #[error("XML parse failed: {0}")]
    Xml(String),

    /// The body of a JSON feed could not be parsed.
    #[error("JSON parse failed: {0}")]
    Json(String),
}
