//! Field extraction from parsed feeds.
//!
//! Every function here is total: missing nodes, attributes or JSON keys
//! project to zero values or `None`, never to an error.

use serde_json::Value;

use crate::coerce::{to_float, to_int};
use crate::types::{ExtendedData, Records, RunListSummary, RunSummary, Scalar, Split, UserData, Waypoint};
use crate::xml::XmlElement;

/// Record type whose entry is dropped when it maps to `SENTINEL_VALUE`.
const SENTINEL_KEY: &str = "k";
const SENTINEL_VALUE: &str = "v";

fn text<'a>(element: &'a XmlElement, path: &[&str]) -> &'a str {
    element.path(path).map(XmlElement::text).unwrap_or_default()
}

fn int(element: &XmlElement, path: &[&str]) -> i64 {
    to_int(text(element, path))
}

fn float(element: &XmlElement, path: &[&str]) -> f64 {
    to_float(text(element, path))
}

fn string(element: &XmlElement, path: &[&str]) -> String {
    text(element, path).to_string()
}

fn attr_int(element: Option<&XmlElement>, name: &str) -> i64 {
    to_int(element.and_then(|e| e.attr(name)).unwrap_or_default())
}

pub(crate) fn user_data(root: &XmlElement) -> UserData {
    let user = root.child("user");
    UserData {
        external_profile_id: attr_int(user, "externalProfileID"),
        id: attr_int(user, "id"),
        total_gps_runs: int(root, &["user", "totalGPSRuns"]),
        total_distance: float(root, &["userTotals", "totalDistance"]),
        total_run_distance: float(root, &["userTotals", "totalRunDistance"]),
        total_run_duration: int(root, &["userTotals", "totalRunDuration"]),
        total_duration: int(root, &["userTotals", "totalDuration"]),
        total_runs: int(root, &["userTotals", "totalRuns"]),
        total_calories: int(root, &["userTotals", "totalCalories"]),
        average_runs_per_week: int(root, &["userTotals", "averageRunsPerWeek"]),
        preferred_run_day_of_week: string(root, &["userTotals", "preferredRunDayOfWeek"]),
        previous_sync_time: string(root, &["userTotals", "previousSyncTime"]),
        last_calculated: string(root, &["userTotals", "lastCalculated"]),
    }
}

pub(crate) fn records(root: &XmlElement) -> Records {
    let mut records = Records::new();
    if let Some(list) = root.child("PersonalRecordList") {
        for record in list.children("PersonalRecord") {
            records.insert(string(record, &["type"]), string(record, &["value"]));
        }
    }
    if records.get(SENTINEL_KEY) == Some(SENTINEL_VALUE) {
        records.remove(SENTINEL_KEY);
    }
    records
}

pub(crate) fn run_list(root: &XmlElement) -> Vec<RunSummary> {
    let Some(list) = root.child("runList") else {
        return Vec::new();
    };
    list.children("run")
        .map(|run| RunSummary {
            run_id: attr_int(Some(run), "id"),
            start_time: string(run, &["startTime"]),
            distance: float(run, &["distance"]),
            duration: int(run, &["duration"]),
            sync_time: string(run, &["syncTime"]),
            calories: float(run, &["calories"]),
            name: string(run, &["name"]),
            description: string(run, &["description"]),
            how_felt: int(run, &["howFelt"]),
            weather: int(run, &["weather"]),
            terrain: int(run, &["terrain"]),
            intensity: int(run, &["intensity"]),
            gpx_id: string(run, &["gpxId"]),
            has_gps_data: string(run, &["hasGpsData"]),
            equipment_type: string(run, &["equipmentType"]),
        })
        .collect()
}

pub(crate) fn run_list_summary(root: &XmlElement) -> RunListSummary {
    RunListSummary {
        runs: int(root, &["runListSummary", "runs"]),
        distance: float(root, &["runListSummary", "distance"]),
        run_duration: int(root, &["runListSummary", "runDuration"]),
        calories: float(root, &["runListSummary", "calories"]),
        duration: int(root, &["runListSummary", "duration"]),
    }
}

pub(crate) fn recent_run_id(root: &XmlElement) -> Option<String> {
    root.child("mostRecentRun")
        .and_then(|run| run.attr("id"))
        .map(str::to_string)
}

pub(crate) fn waypoints(doc: &Value, run_id: &str) -> Vec<Waypoint> {
    let route = doc.pointer("/plusService/route");
    let gpx_id = Scalar::from_json(route.and_then(|r| r.get("id")));
    let Some(list) = route.and_then(|r| r.get("waypointList")).and_then(Value::as_array) else {
        return Vec::new();
    };
    let run_id = to_int(run_id);
    list.iter()
        .map(|point| Waypoint {
            run_id,
            lat: Scalar::from_json(point.get("lat")),
            time: Scalar::from_json(point.get("time")),
            lon: Scalar::from_json(point.get("lon")),
            alt: Scalar::from_json(point.get("alt")),
            gpx_id: gpx_id.clone(),
        })
        .collect()
}

/// Splits stored under `key` in snapshot `index` of the sports data.
pub(crate) fn splits(doc: &Value, index: usize, key: &str, run_id: &str) -> Vec<Split> {
    let Some(list) = doc
        .pointer("/plusService/sportsData/snapShotList")
        .and_then(|snapshots| snapshots.get(index))
        .and_then(|snapshot| snapshot.get(key))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };
    let run_id = to_int(run_id);
    list.iter()
        .map(|split| Split {
            distance: Scalar::from_json(split.get("distance")),
            pace: Scalar::from_json(split.get("pace")),
            event: Scalar::from_json(split.get("event")),
            duration: Scalar::from_json(split.get("duration")),
            id: Scalar::from_json(split.get("id")),
            run_id,
        })
        .collect()
}

pub(crate) fn extended_data(doc: &Value, run_id: &str) -> Vec<ExtendedData> {
    let Some(list) = doc
        .pointer("/plusService/sportsData/extendedDataList/extendedData")
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };
    list.iter()
        .map(|entry| ExtendedData {
            run_id: run_id.to_string(),
            data_type: Scalar::from_json(entry.get("dataType")),
            data: Scalar::from_json(entry.get("data")),
            interval_type: Scalar::from_json(entry.get("intervalType")),
            interval_value: Scalar::from_json(entry.get("intervalValue")),
            interval_unit: Scalar::from_json(entry.get("intervalUnit")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn xml(doc: &str) -> XmlElement {
        XmlElement::parse(doc).unwrap()
    }

    #[test]
    fn user_data_defaults_missing_nodes() {
        let root = xml(r#"<plusService><user id="9"/></plusService>"#);
        let user = user_data(&root);
        assert_eq!(user.id, 9);
        assert_eq!(user.external_profile_id, 0);
        assert_eq!(user.total_distance, 0.0);
        assert_eq!(user.preferred_run_day_of_week, "");
    }

    #[test]
    fn user_data_coerces_textual_numbers() {
        let root = xml(
            "<plusService><userTotals><totalDistance> 412.8315</totalDistance>\
             <totalRuns>64.0</totalRuns></userTotals></plusService>",
        );
        let user = user_data(&root);
        assert_eq!(user.total_distance, 412.8315);
        assert_eq!(user.total_runs, 64);
    }

    #[test]
    fn records_keyed_by_type() {
        let root = xml(
            "<plusService><PersonalRecordList>\
             <PersonalRecord><type>FASTEST_MILE</type><value>412000</value></PersonalRecord>\
             <PersonalRecord><type>A|B</type><value>1|2</value></PersonalRecord>\
             </PersonalRecordList></plusService>",
        );
        let records = records(&root);
        assert_eq!(records.len(), 2);
        assert_eq!(records.get("FASTEST_MILE"), Some("412000"));
        assert_eq!(records.get("A|B"), Some("1|2"));
    }

    #[test]
    fn records_empty_when_list_has_no_entries() {
        let root = xml("<plusService><PersonalRecordList/></plusService>");
        assert!(records(&root).is_empty());
        let root = xml("<plusService/>");
        assert!(records(&root).is_empty());
    }

    #[test]
    fn records_drop_sentinel_collision() {
        let root = xml(
            "<plusService><PersonalRecordList>\
             <PersonalRecord><type>k</type><value>v</value></PersonalRecord>\
             <PersonalRecord><type>FASTEST_5K</type><value>1501000</value></PersonalRecord>\
             </PersonalRecordList></plusService>",
        );
        let records = records(&root);
        assert_eq!(records.len(), 1);
        assert_eq!(records.get("k"), None);
    }

    #[test]
    fn records_keep_k_with_other_value() {
        let root = xml(
            "<plusService><PersonalRecordList>\
             <PersonalRecord><type>k</type><value>7</value></PersonalRecord>\
             </PersonalRecordList></plusService>",
        );
        assert_eq!(records(&root).get("k"), Some("7"));
    }

    #[test]
    fn run_list_empty_without_runs() {
        let root = xml("<plusService><runList/></plusService>");
        assert!(run_list(&root).is_empty());
    }

    #[test]
    fn recent_run_id_is_untyped() {
        let root = xml(r#"<plusService><mostRecentRun id="00042"/></plusService>"#);
        assert_eq!(recent_run_id(&root).as_deref(), Some("00042"));
        assert_eq!(recent_run_id(&xml("<plusService/>")), None);
    }

    #[test]
    fn waypoints_empty_when_list_is_null() {
        let doc = json!({"plusService": {"route": {"id": "g", "waypointList": null}}});
        assert!(waypoints(&doc, "1").is_empty());
    }

    #[test]
    fn waypoints_empty_when_list_is_an_object() {
        let doc = json!({"plusService": {"route": {"waypointList": {"lat": 1}}}});
        assert!(waypoints(&doc, "1").is_empty());
    }

    #[test]
    fn waypoints_carry_gpx_id_and_run_id() {
        let doc = json!({"plusService": {"route": {"id": "g1", "waypointList": [
            {"lat": "1.5", "lon": 2, "alt": null, "time": "0"}
        ]}}});
        let points = waypoints(&doc, "77");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].run_id, 77);
        assert_eq!(points[0].gpx_id, Some(Scalar::Text("g1".into())));
        assert_eq!(points[0].lat, Some(Scalar::Text("1.5".into())));
        assert_eq!(points[0].lon, Some(Scalar::Int(2)));
        assert_eq!(points[0].alt, None);
    }

    #[test]
    fn splits_read_the_requested_snapshot() {
        let doc = json!({"plusService": {"sportsData": {"snapShotList": [
            {"kmSplit": [{"id": "km"}], "mileSplit": [{"id": "wrong"}]},
            {"mileSplit": [{"id": "mile", "duration": 501000}], "kmSplit": [{"id": "wrong"}]}
        ]}}});
        let km = splits(&doc, 0, "kmSplit", "5");
        let mile = splits(&doc, 1, "mileSplit", "5");
        assert_eq!(km.len(), 1);
        assert_eq!(km[0].id, Some(Scalar::Text("km".into())));
        assert_eq!(mile.len(), 1);
        assert_eq!(mile[0].id, Some(Scalar::Text("mile".into())));
        assert_eq!(mile[0].duration, Some(Scalar::Int(501000)));
    }

    #[test]
    fn splits_empty_when_snapshot_missing() {
        let doc = json!({"plusService": {"sportsData": {"snapShotList": [{"kmSplit": []}]}}});
        assert!(splits(&doc, 1, "mileSplit", "5").is_empty());
        assert!(splits(&json!({}), 0, "kmSplit", "5").is_empty());
    }

    #[test]
    fn extended_data_keeps_run_id_as_given() {
        let doc = json!({"plusService": {"sportsData": {"extendedDataList": {"extendedData": [
            {"dataType": "speed", "data": "0.0, 10.8", "intervalValue": 10}
        ]}}}});
        let series = extended_data(&doc, "0042");
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].run_id, "0042");
        assert_eq!(series[0].interval_unit, None);
    }

    #[test]
    fn extended_data_empty_when_not_a_list() {
        let doc = json!({"plusService": {"sportsData": {"extendedDataList": {"extendedData": "x"}}}});
        assert!(extended_data(&doc, "1").is_empty());
    }
}
