use async_trait::async_trait;
use chrono::SecondsFormat;
use log::{debug, error, info};
use reqwest::Client;
use url::Url;

use crate::registration_backend::record::types::SubmissionRecord;
use crate::registration_backend::sinks::{SpreadsheetOutcome, SpreadsheetSink};
use crate::utils::http::{build_client, HttpTimeouts};

/// Column order of the sheet the webhook appends to.
pub const SHEET_COLUMNS: [&str; 14] = [
    "Timestamp",
    "ID",
    "Full Name",
    "Email",
    "Phone",
    "Gender",
    "Date of Birth",
    "Address",
    "Password",
    "Latitude",
    "Longitude",
    "User Agent",
    "Platform",
    "Screen Resolution",
];

/// Flattens a record into `(column, value)` pairs in sheet order.
/// Missing coordinates become empty cells.
pub fn sheet_row(record: &SubmissionRecord) -> Vec<(&'static str, String)> {
    let values = [
        record.submission_date.to_rfc3339_opts(SecondsFormat::Millis, true),
        record.id.to_string(),
        record.full_name.clone(),
        record.email.clone(),
        record.phone.clone(),
        record.gender.clone(),
        record.dob.to_string(),
        record.address.clone(),
        record.password.clone(),
        record.latitude.map(|v| v.to_string()).unwrap_or_default(),
        record.longitude.map(|v| v.to_string()).unwrap_or_default(),
        record.device_info.user_agent.clone(),
        record.device_info.platform.clone(),
        record.device_info.screen_resolution.clone(),
    ];

    SHEET_COLUMNS.into_iter().zip(values).collect()
}

/// Form-posts each record to an opaque webhook. The response is never
/// inspected, so remote rejection looks the same as acceptance.
pub struct SpreadsheetWebhookSink {
    client: Client,
    webhook_url: Option<Url>,
}

impl SpreadsheetWebhookSink {
    pub fn new(webhook_url: Option<Url>, timeouts: HttpTimeouts) -> Result<Self, String> {
        let client = build_client(timeouts)?;

        Ok(Self { client, webhook_url })
    }
}

#[async_trait]
impl SpreadsheetSink for SpreadsheetWebhookSink {
    fn name(&self) -> &str {
        "Google Sheets"
    }

    async fn append(&self, record: &SubmissionRecord) -> SpreadsheetOutcome {
        let Some(url) = self.webhook_url.clone() else {
            error!("Google Sheets save error: webhook URL not configured");
            return SpreadsheetOutcome::LocalError("webhook URL not configured".to_string());
        };

        match self.client.post(url).form(&sheet_row(record)).send().await {
            Ok(resp) => {
                debug!("Spreadsheet webhook answered {} (not inspected)", resp.status());
                info!("Data sent to Google Sheets (id {})", record.id);
                SpreadsheetOutcome::Dispatched
            }
            Err(e) => {
                error!("Google Sheets save error: {}", e);
                SpreadsheetOutcome::LocalError(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{sample_record, serve, short_timeouts, silent_server};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Form, Router};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    type Rows = Arc<Mutex<Vec<HashMap<String, String>>>>;

    async fn webhook_answering(status: StatusCode) -> (Url, Rows) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let seen = received.clone();
        let app = Router::new().route(
            "/exec",
            post(move |Form(fields): Form<HashMap<String, String>>| {
                let seen = seen.clone();
                async move {
                    seen.lock().unwrap().push(fields);
                    (status, "Success")
                }
            }),
        );
        let url = serve(app).await.join("exec").unwrap();
        (url, received)
    }

    #[test]
    fn row_follows_column_schema() {
        let record = sample_record(1001);
        let row = sheet_row(&record);

        let columns: Vec<&str> = row.iter().map(|(column, _)| *column).collect();
        assert_eq!(columns, SHEET_COLUMNS.to_vec());
        assert_eq!(row[1].1, "1001");
        assert_eq!(row[6].1, "1990-12-10");
        assert_eq!(row[8].1, "secret");
        assert_eq!(row[9].1, "23.5937");
        assert_eq!(row[13].1, "1920x1080");
    }

    #[test]
    fn absent_coordinates_are_empty_cells() {
        let mut record = sample_record(1001);
        record.latitude = None;
        record.longitude = None;

        let row = sheet_row(&record);

        assert_eq!(row[9], ("Latitude", String::new()));
        assert_eq!(row[10], ("Longitude", String::new()));
    }

    #[tokio::test]
    async fn posts_every_column_to_webhook() {
        let (url, received) = webhook_answering(StatusCode::OK).await;
        let sink = SpreadsheetWebhookSink::new(Some(url), HttpTimeouts::default()).unwrap();

        let outcome = sink.append(&sample_record(1001)).await;

        assert_eq!(outcome, SpreadsheetOutcome::Dispatched);
        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].len(), SHEET_COLUMNS.len());
        assert_eq!(received[0]["Full Name"], "Ada Lovelace");
        assert_eq!(received[0]["Screen Resolution"], "1920x1080");
    }

    #[tokio::test]
    async fn remote_rejection_still_reports_dispatched() {
        let (url, _) = webhook_answering(StatusCode::INTERNAL_SERVER_ERROR).await;
        let sink = SpreadsheetWebhookSink::new(Some(url), HttpTimeouts::default()).unwrap();

        let outcome = sink.append(&sample_record(1001)).await;

        assert!(outcome.was_dispatched());
    }

    #[tokio::test]
    async fn network_error_is_local_error() {
        let url = Url::parse("http://127.0.0.1:9/exec").unwrap();
        let sink = SpreadsheetWebhookSink::new(Some(url), HttpTimeouts::default()).unwrap();

        let outcome = sink.append(&sample_record(1001)).await;

        assert!(matches!(outcome, SpreadsheetOutcome::LocalError(_)));
    }

    #[tokio::test]
    async fn silent_webhook_times_out_as_local_error() {
        let url = silent_server().await.join("exec").unwrap();
        let sink = SpreadsheetWebhookSink::new(Some(url), short_timeouts()).unwrap();

        let record = sample_record(1001);
        let outcome = tokio::time::timeout(Duration::from_secs(5), sink.append(&record))
            .await
            .expect("append should give up on its own");

        assert!(matches!(outcome, SpreadsheetOutcome::LocalError(_)));
    }

    #[tokio::test]
    async fn missing_url_is_local_error() {
        let sink = SpreadsheetWebhookSink::new(None, HttpTimeouts::default()).unwrap();

        let outcome = sink.append(&sample_record(1001)).await;

        assert_eq!(
            outcome,
            SpreadsheetOutcome::LocalError("webhook URL not configured".to_string())
        );
    }
}
