use chrono::SecondsFormat;
use sqlx::AnyConnection;

use crate::registration_backend::record::types::{CustomerLookupResult, SubmissionRecord};

// Fixed-width UTC timestamps, so ordering the text column orders by time.
fn timestamp_column(record: &SubmissionRecord) -> String {
    record.submission_date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub async fn insert_customer(
    conn: &mut AnyConnection,
    record: &SubmissionRecord,
) -> Result<(), String> {
    sqlx::query(
        "INSERT INTO customers (
            id, full_name, email, phone, gender, dob, address, password,
            latitude, longitude, user_agent, platform, screen_resolution,
            submission_date
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(record.id)
    .bind(&record.full_name)
    .bind(&record.email)
    .bind(&record.phone)
    .bind(&record.gender)
    .bind(record.dob.to_string())
    .bind(&record.address)
    .bind(&record.password)
    .bind(record.latitude)
    .bind(record.longitude)
    .bind(&record.device_info.user_agent)
    .bind(&record.device_info.platform)
    .bind(&record.device_info.screen_resolution)
    .bind(timestamp_column(record))
    .execute(conn)
    .await
    .map_err(|e| e.to_string())?;

    Ok(())
}

/// Most recent row for `phone`, password column never selected.
pub async fn latest_customer_by_phone(
    conn: &mut AnyConnection,
    phone: &str,
) -> Result<Option<CustomerLookupResult>, String> {
    sqlx::query_as::<_, CustomerLookupResult>(
        "SELECT id, full_name, email, phone, gender, dob, address,
                latitude, longitude, user_agent, platform, screen_resolution,
                submission_date
         FROM customers
         WHERE phone = ?
         ORDER BY submission_date DESC
         LIMIT 1",
    )
    .bind(phone)
    .fetch_optional(conn)
    .await
    .map_err(|e| e.to_string())
}
