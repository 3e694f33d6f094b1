//! Blocking client for the legacy Nike+ feed endpoints.
//!
//! # Overview
//! Authenticates with a pre-obtained session id (sent as the `plusid`
//! cookie), fetches one of the fixed XML or JSON feeds, and projects the
//! payload into flat records. One GET, one parse, one projection per query.
//!
//! # Design
//! - `FeedClient` is immutable: a session id, an `Endpoints` table and a
//!   `Transport`.
//! - Each query is split into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`); `get_*` joins the two through
//!   the transport. The build/parse halves never touch the network.
//! - XML-sourced fields are coerced to fixed types with zero defaults;
//!   JSON-sourced fields pass through as loosely-typed `Scalar`s.
//! - The endpoint table is configuration, not a constant, so the host can
//!   change without a rebuild.

pub mod client;
pub mod coerce;
pub mod endpoints;
pub mod error;
pub mod http;
mod projection;
pub mod transport;
pub mod types;
pub mod xml;

pub use client::FeedClient;
pub use endpoints::{Endpoints, Feed};
pub use error::FeedError;
pub use http::{HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{
    ExtendedData, Records, RunListSummary, RunSummary, Scalar, SessionId, Split, UserData, Waypoint,
};
pub use xml::XmlElement;
