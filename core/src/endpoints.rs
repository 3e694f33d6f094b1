//! Endpoint URL table.
//!
//! # Design
//! The table is plain data rather than constants inside the client, so a
//! deployment can point it at another host (or at the mock server) without
//! a rebuild. `Endpoints::default()` reproduces the service's fixed table.

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the feed host in `Endpoints::from_env`.
pub const BASE_URL_ENV: &str = "PLUSFEED_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "http://nikerunning.nike.com";

const USER_DATA_PATH: &str = "/nikeplus/v2/services/app/get_user_data.jsp?_plus=true";
const RECORDS_PATH: &str = "/nikeplus/v2/services/app/personal_records.jsp?_plus=true";
const RUN_LIST_PATH: &str = "/nikeplus/v2/services/app/run_list.jsp?_plus=true";
const GOAL_LIST_PATH: &str = "/nikeplus/v2/services/app/goal_list.jsp?_plus=true";
const FULL_GPS_PATH: &str =
    "/nikeplus/v2/services/app/get_gps_detail.jsp?_plus=true&&format=json&id=";
const FULL_RUN_PATH: &str = "/nikeplus/v2/services/app/get_run.jsp?_plus=true&id=";

/// The logical feeds the service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    UserData,
    Records,
    RunList,
    GoalList,
    /// GPS detail (JSON): waypoints, splits and extended data.
    FullGps,
    FullRun,
}

/// URL template for every feed. Per-run templates end where the run id is
/// appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub user_data: String,
    pub records: String,
    pub run_list: String,
    pub goal_list: String,
    pub full_gps: String,
    pub full_run: String,
}

impl Endpoints {
    /// The service's feed paths on another host. A trailing slash on
    /// `base_url` is ignored.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            user_data: format!("{base}{USER_DATA_PATH}"),
            records: format!("{base}{RECORDS_PATH}"),
            run_list: format!("{base}{RUN_LIST_PATH}"),
            goal_list: format!("{base}{GOAL_LIST_PATH}"),
            full_gps: format!("{base}{FULL_GPS_PATH}"),
            full_run: format!("{base}{FULL_RUN_PATH}"),
        }
    }

    /// Default table, or the default paths on `$PLUSFEED_BASE_URL` when it
    /// is set and non-empty.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(base) if !base.trim().is_empty() => Self::with_base_url(base.trim()),
            _ => Self::default(),
        }
    }

    pub fn template(&self, feed: Feed) -> &str {
        match feed {
            Feed::UserData => &self.user_data,
            Feed::Records => &self.records,
            Feed::RunList => &self.run_list,
            Feed::GoalList => &self.goal_list,
            Feed::FullGps => &self.full_gps,
            Feed::FullRun => &self.full_run,
        }
    }

    /// Request URL for `feed`: the template with `run_id` (or nothing)
    /// appended verbatim.
    pub fn url(&self, feed: Feed, run_id: Option<&str>) -> String {
        format!("{}{}", self.template(feed), run_id.unwrap_or_default())
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}
