use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub user_agent: String,
    pub platform: String,
    pub screen_resolution: String,
}

/// One form submission, as handed to every sink.
///
/// `id` and `submission_date` are stamped once by the builder and never
/// touched again; sinks only ever see a shared borrow.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub dob: NaiveDate,
    pub address: String,
    pub password: String,
    #[serde(default, deserialize_with = "coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "coordinate")]
    pub longitude: Option<f64>,
    pub device_info: DeviceInfo,
    pub submission_date: DateTime<Utc>,
}

/// The most recent stored row for a phone number. There is no password
/// field, so it can never leak through a lookup.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct CustomerLookupResult {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub dob: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub user_agent: String,
    pub platform: String,
    pub screen_resolution: String,
    pub submission_date: String,
}

// Browsers post coordinates as form strings, empty when location was never granted.
fn coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let value = match Option::<Raw>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Raw::Number(n)) => n,
        Some(Raw::Text(s)) if s.trim().is_empty() => return Ok(None),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().map_err(|e| {
            <D::Error as serde::de::Error>::custom(format!("invalid coordinate {:?}: {}", s, e))
        })?,
    };

    // "NaN" and "inf" parse, but no SQL DOUBLE column stores them
    if !value.is_finite() {
        return Err(serde::de::Error::custom(format!(
            "coordinate must be finite, got {}",
            value
        )));
    }
    Ok(Some(value))
}
