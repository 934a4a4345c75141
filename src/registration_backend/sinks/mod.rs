//! Storage endpoints a submission is delivered to.
//!
//! The two sinks make different promises and get different outcome types:
//! the registration API confirms or rejects each row, the spreadsheet webhook
//! only tells us the request left this process. Neither adapter returns an
//! error; every failure is folded into its outcome value.

use async_trait::async_trait;

use crate::registration_backend::record::types::SubmissionRecord;

pub mod registration;
pub mod spreadsheet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Success,
    Failure(String),
}

impl RegistrationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RegistrationOutcome::Success)
    }
}

/// Best-effort delivery. `Dispatched` says nothing about whether the row
/// was stored remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetOutcome {
    Dispatched,
    LocalError(String),
}

impl SpreadsheetOutcome {
    pub fn was_dispatched(&self) -> bool {
        matches!(self, SpreadsheetOutcome::Dispatched)
    }
}

#[async_trait]
pub trait RegistrationSink: Send + Sync {
    async fn register(&self, record: &SubmissionRecord) -> RegistrationOutcome;
    fn name(&self) -> &str;
}

#[async_trait]
pub trait SpreadsheetSink: Send + Sync {
    async fn append(&self, record: &SubmissionRecord) -> SpreadsheetOutcome;
    fn name(&self) -> &str;
}
