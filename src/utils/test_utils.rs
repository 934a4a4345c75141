//! Fixtures and fakes shared by the in-crate tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use chrono::{NaiveDate, TimeZone, Utc};
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;
use tempfile::TempDir;
use url::Url;

use crate::db::pool::ensure_schema;
use crate::registration_backend::dispatch::submit::SubmitControl;
use crate::registration_backend::lookup::autofill::{AutofillState, AutofillView};
use crate::registration_backend::lookup::client::{CustomerLookup, LookupOutcome};
use crate::registration_backend::record::capture::FormFields;
use crate::registration_backend::record::types::{
    CustomerLookupResult, DeviceInfo, SubmissionRecord,
};
use crate::registration_backend::sinks::{
    RegistrationOutcome, RegistrationSink, SpreadsheetOutcome, SpreadsheetSink,
};
use crate::utils::http::HttpTimeouts;

/// SQLite file pool with one connection; the directory lives as long as this does.
pub struct TestDb {
    pub pool: AnyPool,
    _dir: TempDir,
}

pub async fn setup_test_db() -> TestDb {
    install_default_drivers();
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("customers.db").display());

    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(2))
        .connect(&url)
        .await
        .unwrap();
    ensure_schema(&pool).await.unwrap();

    TestDb { pool, _dir: dir }
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn serve(app: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Url::parse(&format!("http://{}/", addr)).unwrap()
}

/// Accepts connections and never writes a byte back.
pub async fn silent_server() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    Url::parse(&format!("http://{}/", addr)).unwrap()
}

pub fn short_timeouts() -> HttpTimeouts {
    HttpTimeouts {
        connect: Duration::from_millis(500),
        request: Duration::from_millis(300),
    }
}

pub fn sample_fields() -> FormFields {
    FormFields {
        full_name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: "5551234567".to_string(),
        gender: "female".to_string(),
        dob: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
        address: "12 Analytical Row".to_string(),
        password: "secret".to_string(),
        confirm_password: "secret".to_string(),
        position: None,
    }
}

pub fn sample_record(id: i64) -> SubmissionRecord {
    SubmissionRecord {
        id,
        full_name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: "5551234567".to_string(),
        gender: "female".to_string(),
        dob: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
        address: "12 Analytical Row".to_string(),
        password: "secret".to_string(),
        latitude: Some(23.5937),
        longitude: Some(78.9629),
        device_info: DeviceInfo {
            user_agent: "Mozilla/5.0".to_string(),
            platform: "Linux x86_64".to_string(),
            screen_resolution: "1920x1080".to_string(),
        },
        submission_date: Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap(),
    }
}

pub fn sample_lookup_result() -> CustomerLookupResult {
    CustomerLookupResult {
        id: 1001,
        full_name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: "5551234567".to_string(),
        gender: "female".to_string(),
        dob: "1990-12-10".to_string(),
        address: "12 Analytical Row".to_string(),
        latitude: Some(23.5937),
        longitude: Some(78.9629),
        user_agent: "Mozilla/5.0".to_string(),
        platform: "Linux x86_64".to_string(),
        screen_resolution: "1920x1080".to_string(),
        submission_date: "2026-10-17T09:30:00.000Z".to_string(),
    }
}

pub struct FakeRegistrationSink {
    outcome: RegistrationOutcome,
    delay: Duration,
    received: Mutex<Vec<i64>>,
}

impl FakeRegistrationSink {
    pub fn succeeding() -> Self {
        Self::answering(RegistrationOutcome::Success)
    }

    pub fn failing(reason: &str) -> Self {
        Self::answering(RegistrationOutcome::Failure(reason.to_string()))
    }

    fn answering(outcome: RegistrationOutcome) -> Self {
        Self {
            outcome,
            delay: Duration::ZERO,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn received_ids(&self) -> Vec<i64> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegistrationSink for FakeRegistrationSink {
    fn name(&self) -> &str {
        "fake database"
    }

    async fn register(&self, record: &SubmissionRecord) -> RegistrationOutcome {
        self.received.lock().unwrap().push(record.id);
        tokio::time::sleep(self.delay).await;
        self.outcome.clone()
    }
}

pub struct FakeSpreadsheetSink {
    outcome: SpreadsheetOutcome,
    delay: Duration,
    received: Mutex<Vec<i64>>,
}

impl FakeSpreadsheetSink {
    pub fn dispatching() -> Self {
        Self::answering(SpreadsheetOutcome::Dispatched)
    }

    pub fn erroring(reason: &str) -> Self {
        Self::answering(SpreadsheetOutcome::LocalError(reason.to_string()))
    }

    fn answering(outcome: SpreadsheetOutcome) -> Self {
        Self {
            outcome,
            delay: Duration::ZERO,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn received_ids(&self) -> Vec<i64> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpreadsheetSink for FakeSpreadsheetSink {
    fn name(&self) -> &str {
        "fake sheet"
    }

    async fn append(&self, record: &SubmissionRecord) -> SpreadsheetOutcome {
        self.received.lock().unwrap().push(record.id);
        tokio::time::sleep(self.delay).await;
        self.outcome.clone()
    }
}

#[derive(Default)]
pub struct RecordingControl {
    states: Mutex<Vec<(bool, String)>>,
    messages: Mutex<Vec<String>>,
}

impl RecordingControl {
    pub fn states(&self) -> Vec<(bool, String)> {
        self.states.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl SubmitControl for RecordingControl {
    fn set_enabled(&self, enabled: bool, label: &str) {
        self.states.lock().unwrap().push((enabled, label.to_string()));
    }

    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
pub struct RecordingView {
    states: Mutex<Vec<AutofillState>>,
}

impl RecordingView {
    pub fn states(&self) -> Vec<AutofillState> {
        self.states.lock().unwrap().clone()
    }
}

impl AutofillView for RecordingView {
    fn show(&self, state: &AutofillState) {
        self.states.lock().unwrap().push(state.clone());
    }
}

pub struct ScriptedLookup {
    answer: Result<LookupOutcome, String>,
    calls: AtomicUsize,
}

impl ScriptedLookup {
    pub fn found(customer: CustomerLookupResult) -> Self {
        Self::answering(Ok(LookupOutcome::Found(customer)))
    }

    pub fn missing() -> Self {
        Self::answering(Ok(LookupOutcome::NotFound))
    }

    pub fn broken(reason: &str) -> Self {
        Self::answering(Err(reason.to_string()))
    }

    fn answering(answer: Result<LookupOutcome, String>) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CustomerLookup for ScriptedLookup {
    async fn find_by_phone(&self, _phone: &str) -> Result<LookupOutcome, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}
