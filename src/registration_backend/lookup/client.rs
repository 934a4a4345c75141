use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::registration_backend::record::types::CustomerLookupResult;
use crate::utils::http::{build_client, HttpTimeouts};

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(CustomerLookupResult),
    NotFound,
}

#[async_trait]
pub trait CustomerLookup: Send + Sync {
    async fn find_by_phone(&self, phone: &str) -> Result<LookupOutcome, String>;
}

#[derive(Deserialize)]
struct LookupResponse {
    success: bool,
    data: Option<CustomerLookupResult>,
}

/// Calls `GET {base}/api/customer/{phone}`.
pub struct CustomerLookupClient {
    client: Client,
    base_url: Url,
}

impl CustomerLookupClient {
    pub fn new(base_url: Url, timeouts: HttpTimeouts) -> Result<Self, String> {
        let client = build_client(timeouts)?;

        Ok(Self { client, base_url })
    }

    fn customer_url(&self, phone: &str) -> Result<Url, String> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| format!("{} cannot be a base URL", self.base_url))?
            .pop_if_empty()
            .extend(["api", "customer", phone]);
        Ok(url)
    }
}

#[async_trait]
impl CustomerLookup for CustomerLookupClient {
    async fn find_by_phone(&self, phone: &str) -> Result<LookupOutcome, String> {
        let resp = self
            .client
            .get(self.customer_url(phone)?)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        if !resp.status().is_success() {
            return Err(format!("Server error: {}", resp.status().as_u16()));
        }

        let body: LookupResponse = resp
            .json()
            .await
            .map_err(|e| format!("Failed to parse response JSON: {}", e))?;

        match (body.success, body.data) {
            (true, Some(customer)) => Ok(LookupOutcome::Found(customer)),
            _ => Ok(LookupOutcome::NotFound),
        }
    }
}
