use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::registration_backend::record::types::SubmissionRecord;
use crate::registration_backend::sinks::{RegistrationOutcome, RegistrationSink};
use crate::utils::http::{build_client, HttpTimeouts};

#[derive(Deserialize)]
struct RegisterResponse {
    success: bool,
    #[serde(default)]
    message: String,
}

/// Posts the record as JSON to `POST {base}/api/register`.
pub struct RegistrationApiSink {
    client: Client,
    endpoint: Url,
}

impl RegistrationApiSink {
    pub fn new(base_url: &Url, timeouts: HttpTimeouts) -> Result<Self, String> {
        let endpoint = base_url.join("api/register").map_err(|e| e.to_string())?;
        let client = build_client(timeouts)?;

        Ok(Self { client, endpoint })
    }

    async fn submit(&self, record: &SubmissionRecord) -> Result<(), String> {
        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(record)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err_text = resp.text().await.unwrap_or_default();
            return Err(format!("Registration API error ({}): {}", status, err_text));
        }

        let body: RegisterResponse = resp
            .json()
            .await
            .map_err(|e| format!("Failed to parse response JSON: {}", e))?;

        if !body.success {
            return Err(body.message);
        }
        Ok(())
    }
}

#[async_trait]
impl RegistrationSink for RegistrationApiSink {
    fn name(&self) -> &str {
        "database"
    }

    async fn register(&self, record: &SubmissionRecord) -> RegistrationOutcome {
        match self.submit(record).await {
            Ok(()) => {
                info!("Data saved to database successfully (id {})", record.id);
                RegistrationOutcome::Success
            }
            Err(e) => {
                error!("Error saving to database: {}", e);
                RegistrationOutcome::Failure(e)
            }
        }
    }
}
