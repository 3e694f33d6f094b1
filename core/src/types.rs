//! Projected records returned by `FeedClient` queries.
//!
//! # Design
//! XML-sourced fields carry a fixed Rust type and are always present: a
//! missing node projects to `0`, `0.0` or `""`. JSON-sourced fields are
//! passed through as `Option<Scalar>` because the service writes the same
//! field as a string in one response and a number in the next. Field names
//! serialize exactly as the feeds spell them.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Opaque session identifier relayed as the `plusid` cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for SessionId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A JSON value the service may write as a string, a number or a bool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Project a JSON value. Missing keys, `null`, arrays and objects are
    /// `None`.
    pub fn from_json(value: Option<&Value>) -> Option<Self> {
        match value? {
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Scalar::Int(i)),
                None => n.as_f64().map(Scalar::Float),
            },
            Value::String(s) => Some(Scalar::Text(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Numeric reading of the value; text goes through loose coercion.
    pub fn as_f64(&self) -> f64 {
        match self {
            Scalar::Bool(b) => f64::from(u8::from(*b)),
            Scalar::Int(i) => *i as f64,
            Scalar::Float(f) => *f,
            Scalar::Text(s) => crate::coerce::to_float(s),
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// Account totals from the user-summary feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(rename = "externalProfileID")]
    pub external_profile_id: i64,
    pub id: i64,
    #[serde(rename = "totalGPSRuns")]
    pub total_gps_runs: i64,
    pub total_distance: f64,
    pub total_run_distance: f64,
    pub total_run_duration: i64,
    pub total_duration: i64,
    pub total_runs: i64,
    pub total_calories: i64,
    pub average_runs_per_week: i64,
    pub preferred_run_day_of_week: String,
    pub previous_sync_time: String,
    pub last_calculated: String,
}

/// Personal records keyed by record type, in feed order.
///
/// Serializes as a JSON object. Inserting an existing type keeps its
/// position and replaces the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Records {
    entries: Vec<(String, String)>,
}

impl Records {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record_type: impl Into<String>, value: impl Into<String>) {
        let record_type = record_type.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == record_type) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((record_type, value)),
        }
    }

    pub fn get(&self, record_type: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == record_type)
            .map(|(_, value)| value.as_str())
    }

    pub fn remove(&mut self, record_type: &str) -> Option<String> {
        let index = self.entries.iter().position(|(key, _)| key == record_type)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for Records {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// One entry of the run-list feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: i64,
    pub start_time: String,
    pub distance: f64,
    pub duration: i64,
    pub sync_time: String,
    pub calories: f64,
    pub name: String,
    pub description: String,
    pub how_felt: i64,
    pub weather: i64,
    pub terrain: i64,
    pub intensity: i64,
    pub gpx_id: String,
    pub has_gps_data: String,
    pub equipment_type: String,
}

/// Totals across every run in the run-list feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunListSummary {
    pub runs: i64,
    pub distance: f64,
    pub run_duration: i64,
    pub calories: f64,
    pub duration: i64,
}

/// One GPS sample of a run's trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub run_id: i64,
    pub lat: Option<Scalar>,
    pub time: Option<Scalar>,
    pub lon: Option<Scalar>,
    pub alt: Option<Scalar>,
    pub gpx_id: Option<Scalar>,
}

/// A per-kilometer or per-mile split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Split {
    pub distance: Option<Scalar>,
    pub pace: Option<Scalar>,
    pub event: Option<Scalar>,
    pub duration: Option<Scalar>,
    pub id: Option<Scalar>,
    pub run_id: i64,
}

/// One series of the extended per-run data (distance, speed, heart rate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedData {
    #[serde(rename = "run_id")]
    pub run_id: String,
    pub data_type: Option<Scalar>,
    pub data: Option<Scalar>,
    pub interval_type: Option<Scalar>,
    pub interval_value: Option<Scalar>,
    pub interval_unit: Option<Scalar>,
}

impl ExtendedData {
    /// Expand the comma-delimited `data` series into numbers. Entries that
    /// are not numeric are skipped.
    pub fn samples(&self) -> Vec<f64> {
        match &self.data {
            Some(Scalar::Text(series)) => series
                .split(',')
                .map(str::trim)
                .filter_map(|sample| sample.parse::<f64>().ok())
                .collect(),
            Some(value @ (Scalar::Int(_) | Scalar::Float(_))) => vec![value.as_f64()],
            Some(Scalar::Bool(_)) | None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_keeps_json_typing() {
        let v = json!({"a": 1, "b": 1.5, "c": "1.5", "d": true, "e": null, "f": [1]});
        assert_eq!(Scalar::from_json(v.get("a")), Some(Scalar::Int(1)));
        assert_eq!(Scalar::from_json(v.get("b")), Some(Scalar::Float(1.5)));
        assert_eq!(Scalar::from_json(v.get("c")), Some(Scalar::Text("1.5".into())));
        assert_eq!(Scalar::from_json(v.get("d")), Some(Scalar::Bool(true)));
        assert_eq!(Scalar::from_json(v.get("e")), None);
        assert_eq!(Scalar::from_json(v.get("f")), None);
        assert_eq!(Scalar::from_json(v.get("missing")), None);
    }

    #[test]
    fn scalar_reads_numbers_from_text() {
        assert_eq!(Scalar::Text("37.7751".into()).as_f64(), 37.7751);
        assert_eq!(Scalar::Int(13).as_f64(), 13.0);
        assert_eq!(Scalar::Text("".into()).as_f64(), 0.0);
    }

    #[test]
    fn session_id_from_integer() {
        assert_eq!(SessionId::from(1234u64).as_str(), "1234");
        assert_eq!(SessionId::from("abc").to_string(), "abc");
    }

    #[test]
    fn records_replace_in_place() {
        let mut records = Records::new();
        records.insert("FASTEST_MILE", "412000");
        records.insert("FASTEST_5K", "1501000");
        records.insert("FASTEST_MILE", "405000");
        let entries: Vec<_> = records.iter().collect();
        assert_eq!(entries, [("FASTEST_MILE", "405000"), ("FASTEST_5K", "1501000")]);
    }

    #[test]
    fn records_serialize_as_object() {
        let mut records = Records::new();
        records.insert("LONGEST_RUN", "21.0975");
        assert_eq!(
            serde_json::to_value(&records).unwrap(),
            json!({"LONGEST_RUN": "21.0975"})
        );
    }

    #[test]
    fn user_data_uses_feed_field_names() {
        let user = UserData {
            external_profile_id: 1,
            id: 2,
            total_gps_runs: 3,
            total_distance: 4.5,
            total_run_distance: 4.0,
            total_run_duration: 5,
            total_duration: 6,
            total_runs: 7,
            total_calories: 8,
            average_runs_per_week: 9,
            preferred_run_day_of_week: "Sunday".into(),
            previous_sync_time: String::new(),
            last_calculated: String::new(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["externalProfileID"], 1);
        assert_eq!(json["totalGPSRuns"], 3);
        assert_eq!(json["averageRunsPerWeek"], 9);
        assert_eq!(json["preferredRunDayOfWeek"], "Sunday");
    }

    #[test]
    fn extended_data_uses_snake_case_run_id() {
        let ext = ExtendedData {
            run_id: "1001".into(),
            data_type: Some(Scalar::Text("speed".into())),
            data: Some(Scalar::Text("0.0, 10.8,  ,11.1".into())),
            interval_type: None,
            interval_value: Some(Scalar::Int(10)),
            interval_unit: None,
        };
        let json = serde_json::to_value(&ext).unwrap();
        assert_eq!(json["run_id"], "1001");
        assert_eq!(json["dataType"], "speed");
        assert!(json["intervalType"].is_null());
        assert_eq!(ext.samples(), vec![0.0, 10.8, 11.1]);
    }

    #[test]
    fn single_numeric_sample_is_one_entry() {
        let mut ext = ExtendedData {
            run_id: "1001".into(),
            data_type: Some(Scalar::Text("heartRate".into())),
            data: Some(Scalar::Int(142)),
            interval_type: None,
            interval_value: None,
            interval_unit: None,
        };
        assert_eq!(ext.samples(), vec![142.0]);
        ext.data = Some(Scalar::Float(3.5));
        assert_eq!(ext.samples(), vec![3.5]);
        ext.data = Some(Scalar::Bool(true));
        assert!(ext.samples().is_empty());
    }
}
