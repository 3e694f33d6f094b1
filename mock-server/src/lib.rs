//! Local stand-in for the legacy feed service.
//!
//! Serves the fixtures in `test-vectors/` at the service's feed paths so the
//! client can be exercised over real HTTP. Requests must carry a non-empty
//! `plusid` cookie; per-run feeds need an `id` query parameter naming one
//! of the known runs.

use std::collections::HashMap;

use axum::{
    extract::Query,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tracing::debug;

pub const USER_DATA_XML: &str = include_str!("../../test-vectors/user_data.xml");
pub const PERSONAL_RECORDS_XML: &str = include_str!("../../test-vectors/personal_records.xml");
pub const RUN_LIST_XML: &str = include_str!("../../test-vectors/run_list.xml");
pub const GOAL_LIST_XML: &str = include_str!("../../test-vectors/goal_list.xml");
pub const FULL_RUN_XML: &str = include_str!("../../test-vectors/full_run.xml");
pub const GPS_DETAIL_JSON: &str = include_str!("../../test-vectors/gps_detail.json");
pub const GPS_DETAIL_EMPTY_JSON: &str = include_str!("../../test-vectors/gps_detail_empty.json");

/// Run with a GPS trace, splits and extended data.
pub const GPS_RUN_ID: &str = "1001";
/// Run recorded without GPS; its detail feed has no waypoints or splits.
pub const PLAIN_RUN_ID: &str = "1000";

const FEED_ROOT: &str = "/nikeplus/v2/services/app";

const XML: &str = "text/xml; charset=utf-8";
const JSON: &str = "application/json";

type Params = Query<HashMap<String, String>>;

pub fn app() -> Router {
    Router::new()
        .route(&format!("{FEED_ROOT}/get_user_data.jsp"), get(user_data))
        .route(&format!("{FEED_ROOT}/personal_records.jsp"), get(personal_records))
        .route(&format!("{FEED_ROOT}/run_list.jsp"), get(run_list))
        .route(&format!("{FEED_ROOT}/goal_list.jsp"), get(goal_list))
        .route(&format!("{FEED_ROOT}/get_gps_detail.jsp"), get(gps_detail))
        .route(&format!("{FEED_ROOT}/get_run.jsp"), get(full_run))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// The `plusid` value from the first `Cookie` header that carries one.
///
/// Accepts both the plain `plusid=<id>` cookie and the host-suffixed
/// `plusid=<id>&nikerunning.nike.com` form.
pub fn session_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix("plusid="))
        .map(|rest| rest.split('&').next().unwrap_or_default().to_string())
        .find(|id| !id.is_empty())
}

/// Require a session cookie. The token itself is never logged.
fn authorize(headers: &HeaderMap) -> Result<(), StatusCode> {
    match session_from(headers) {
        Some(_) => {
            debug!("session cookie present");
            Ok(())
        }
        None => {
            debug!("request without a session cookie");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

fn body(content_type: &'static str, payload: &'static str) -> Response {
    ([(header::CONTENT_TYPE, content_type)], payload).into_response()
}

fn run_id(params: &HashMap<String, String>) -> Result<&str, StatusCode> {
    match params.get("id").map(String::as_str) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(StatusCode::BAD_REQUEST),
    }
}

async fn user_data(headers: HeaderMap) -> Result<Response, StatusCode> {
    authorize(&headers)?;
    debug!("serving user data");
    Ok(body(XML, USER_DATA_XML))
}

async fn personal_records(headers: HeaderMap) -> Result<Response, StatusCode> {
    authorize(&headers)?;
    Ok(body(XML, PERSONAL_RECORDS_XML))
}

async fn run_list(headers: HeaderMap) -> Result<Response, StatusCode> {
    authorize(&headers)?;
    Ok(body(XML, RUN_LIST_XML))
}

async fn goal_list(headers: HeaderMap) -> Result<Response, StatusCode> {
    authorize(&headers)?;
    Ok(body(XML, GOAL_LIST_XML))
}

async fn gps_detail(headers: HeaderMap, Query(params): Params) -> Result<Response, StatusCode> {
    authorize(&headers)?;
    match run_id(&params)? {
        GPS_RUN_ID => Ok(body(JSON, GPS_DETAIL_JSON)),
        PLAIN_RUN_ID => Ok(body(JSON, GPS_DETAIL_EMPTY_JSON)),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn full_run(headers: HeaderMap, Query(params): Params) -> Result<Response, StatusCode> {
    authorize(&headers)?;
    match run_id(&params)? {
        GPS_RUN_ID | PLAIN_RUN_ID => Ok(body(XML, FULL_RUN_XML)),
        _ => Err(StatusCode::NOT_FOUND),
    }
}
