use std::time::Duration;

use reqwest::Client;

/// Upper bounds on every outbound call, so a peer that accepts the
/// connection and never answers still yields an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            request: Duration::from_secs(15),
        }
    }
}

pub fn build_client(timeouts: HttpTimeouts) -> Result<Client, String> {
    Client::builder()
        .user_agent(concat!("customer-registration/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(timeouts.connect)
        .timeout(timeouts.request)
        .build()
        .map_err(|e| e.to_string())
}
