//! Feed client: request building, response parsing and the blocking
//! convenience queries that join the two.
//!
//! # Design
//! `FeedClient` holds a session id, an endpoint table and a `Transport`,
//! and carries no mutable state between calls. Every query is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`; the method named after the query runs
//! one round trip through the transport. Per-run queries validate the run
//! id in `build_*`, so a missing id fails before anything is sent.

use serde_json::Value;
use tracing::{debug, warn};

use crate::endpoints::{Endpoints, Feed};
use crate::error::FeedError;
use crate::http::{HttpRequest, HttpResponse};
use crate::projection;
use crate::transport::{Transport, UreqTransport};
use crate::types::{ExtendedData, Records, RunListSummary, RunSummary, SessionId, Split, UserData, Waypoint};
use crate::xml::XmlElement;

/// Host suffix of the literal cookie header the service expects.
const COOKIE_DOMAIN: &str = "nikerunning.nike.com";

/// Client for the legacy feed endpoints.
///
/// Immutable after construction; each query issues exactly one GET.
#[derive(Debug, Clone)]
pub struct FeedClient<T = UreqTransport> {
    session: SessionId,
    endpoints: Endpoints,
    transport: T,
}

impl FeedClient<UreqTransport> {
    /// Client for the default endpoint table over `ureq`.
    pub fn new(session: impl Into<SessionId>) -> Self {
        Self::with_endpoints(session, Endpoints::default())
    }

    pub fn with_endpoints(session: impl Into<SessionId>, endpoints: Endpoints) -> Self {
        Self::with_transport(session, endpoints, UreqTransport::new())
    }
}

impl<T: Transport> FeedClient<T> {
    pub fn with_transport(session: impl Into<SessionId>, endpoints: Endpoints, transport: T) -> Self {
        Self {
            session: session.into(),
            endpoints,
            transport,
        }
    }

    pub fn session(&self) -> &SessionId {
        &self.session
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Request for `feed` with `run_id` appended to the template.
    ///
    /// The session travels twice: in a literal `Cookie` header scoped to the
    /// service host, and as the plain `plusid` cookie.
    pub fn build_request(&self, feed: Feed, run_id: Option<&str>) -> HttpRequest {
        HttpRequest {
            url: self.endpoints.url(feed, run_id),
            headers: vec![
                (
                    "cookie".to_string(),
                    format!("plusid={}&{COOKIE_DOMAIN}", self.session),
                ),
                ("cookie".to_string(), format!("plusid={}", self.session)),
            ],
        }
    }

    /// Run one GET for `feed` and return the raw body.
    pub fn fetch(&self, feed: Feed, run_id: Option<&str>) -> Result<String, FeedError> {
        let response = self.execute(self.build_request(feed, run_id))?;
        into_body(response)
    }

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, FeedError> {
        debug!(url = %request.url, "fetching feed");
        self.transport.execute(&request)
    }

    // -----------------------------------------------------------------------
    // Request builders
    // -----------------------------------------------------------------------

    /// User-summary feed; also serves the most recent run id.
    pub fn build_user_data(&self) -> HttpRequest {
        self.build_request(Feed::UserData, None)
    }

    pub fn build_records(&self) -> HttpRequest {
        self.build_request(Feed::Records, None)
    }

    /// Run-list feed; serves both the run list and its summary.
    pub fn build_run_list(&self) -> HttpRequest {
        self.build_request(Feed::RunList, None)
    }

    pub fn build_goal_list(&self) -> HttpRequest {
        self.build_request(Feed::GoalList, None)
    }

    /// GPS-detail feed for one run; serves waypoints, splits and extended
    /// data.
    pub fn build_gps_detail(&self, run_id: Option<&str>) -> Result<HttpRequest, FeedError> {
        let run_id = require_run_id(run_id, "the GPS detail feed")?;
        Ok(self.build_request(Feed::FullGps, Some(run_id)))
    }

    pub fn build_full_run(&self, run_id: Option<&str>) -> Result<HttpRequest, FeedError> {
        let run_id = require_run_id(run_id, "the full run feed")?;
        Ok(self.build_request(Feed::FullRun, Some(run_id)))
    }

    // -----------------------------------------------------------------------
    // Response parsers
    // -----------------------------------------------------------------------

    pub fn parse_user_data(&self, response: HttpResponse) -> Result<UserData, FeedError> {
        Ok(projection::user_data(&parse_xml(response)?))
    }

    pub fn parse_records(&self, response: HttpResponse) -> Result<Records, FeedError> {
        Ok(projection::records(&parse_xml(response)?))
    }

    pub fn parse_run_list(&self, response: HttpResponse) -> Result<Vec<RunSummary>, FeedError> {
        Ok(projection::run_list(&parse_xml(response)?))
    }

    pub fn parse_run_list_summary(&self, response: HttpResponse) -> Result<RunListSummary, FeedError> {
        Ok(projection::run_list_summary(&parse_xml(response)?))
    }

    pub fn parse_goal_list(&self, response: HttpResponse) -> Result<XmlElement, FeedError> {
        parse_xml(response)
    }

    pub fn parse_full_run(&self, response: HttpResponse) -> Result<XmlElement, FeedError> {
        parse_xml(response)
    }

    pub fn parse_recent_run_id(&self, response: HttpResponse) -> Result<Option<String>, FeedError> {
        Ok(projection::recent_run_id(&parse_xml(response)?))
    }

    pub fn parse_full_gps(&self, run_id: &str, response: HttpResponse) -> Result<Vec<Waypoint>, FeedError> {
        Ok(projection::waypoints(&parse_json(response)?, run_id))
    }

    pub fn parse_km_splits(&self, run_id: &str, response: HttpResponse) -> Result<Vec<Split>, FeedError> {
        Ok(projection::splits(&parse_json(response)?, 0, "kmSplit", run_id))
    }

    pub fn parse_mile_splits(&self, run_id: &str, response: HttpResponse) -> Result<Vec<Split>, FeedError> {
        Ok(projection::splits(&parse_json(response)?, 1, "mileSplit", run_id))
    }

    pub fn parse_extended_data(
        &self,
        run_id: &str,
        response: HttpResponse,
    ) -> Result<Vec<ExtendedData>, FeedError> {
        Ok(projection::extended_data(&parse_json(response)?, run_id))
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn get_user_data(&self) -> Result<UserData, FeedError> {
        self.parse_user_data(self.execute(self.build_user_data())?)
    }

    pub fn get_records(&self) -> Result<Records, FeedError> {
        self.parse_records(self.execute(self.build_records())?)
    }

    pub fn get_run_list(&self) -> Result<Vec<RunSummary>, FeedError> {
        self.parse_run_list(self.execute(self.build_run_list())?)
    }

    pub fn get_run_list_summary(&self) -> Result<RunListSummary, FeedError> {
        self.parse_run_list_summary(self.execute(self.build_run_list())?)
    }

    /// Goal-list feed as an unprojected document.
    pub fn get_goal_list(&self) -> Result<XmlElement, FeedError> {
        self.parse_goal_list(self.execute(self.build_goal_list())?)
    }

    pub fn get_full_gps(&self, run_id: Option<&str>) -> Result<Vec<Waypoint>, FeedError> {
        let request = self.build_gps_detail(run_id)?;
        self.parse_full_gps(run_id.unwrap_or_default(), self.execute(request)?)
    }

    pub fn get_km_splits(&self, run_id: Option<&str>) -> Result<Vec<Split>, FeedError> {
        let request = self.build_gps_detail(run_id)?;
        self.parse_km_splits(run_id.unwrap_or_default(), self.execute(request)?)
    }

    pub fn get_mile_splits(&self, run_id: Option<&str>) -> Result<Vec<Split>, FeedError> {
        let request = self.build_gps_detail(run_id)?;
        self.parse_mile_splits(run_id.unwrap_or_default(), self.execute(request)?)
    }

    pub fn get_extended_data(&self, run_id: Option<&str>) -> Result<Vec<ExtendedData>, FeedError> {
        let request = self.build_gps_detail(run_id)?;
        self.parse_extended_data(run_id.unwrap_or_default(), self.execute(request)?)
    }

    /// Full-run feed as an unprojected document. The GPS detail feed
    /// carries the same run in more detail.
    pub fn get_full_run(&self, run_id: Option<&str>) -> Result<XmlElement, FeedError> {
        let request = self.build_full_run(run_id)?;
        self.parse_full_run(self.execute(request)?)
    }

    /// `id` of the most recent run, as written in the feed.
    pub fn get_recent_run_id(&self) -> Result<Option<String>, FeedError> {
        self.parse_recent_run_id(self.execute(self.build_user_data())?)
    }
}

fn require_run_id<'a>(run_id: Option<&'a str>, feed: &str) -> Result<&'a str, FeedError> {
    match run_id {
        Some(id) => Ok(id),
        None => Err(FeedError::InvalidArgument(format!("a run id is required for {feed}"))),
    }
}

/// Reject non-2xx statuses and hand back the body.
fn into_body(response: HttpResponse) -> Result<String, FeedError> {
    if response.is_success() {
        return Ok(response.body);
    }
    warn!(status = response.status, "feed returned an error status");
    Err(FeedError::HttpError {
        status: response.status,
        body: response.body,
    })
}

fn parse_xml(response: HttpResponse) -> Result<XmlElement, FeedError> {
    XmlElement::parse(&into_body(response)?)
}

fn parse_json(response: HttpResponse) -> Result<Value, FeedError> {
    serde_json::from_str(&into_body(response)?).map_err(|e| FeedError::Json(e.to_string()))
}
