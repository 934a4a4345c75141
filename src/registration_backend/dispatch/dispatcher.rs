use std::sync::Arc;

use log::{error, info, warn};

use crate::registration_backend::record::types::SubmissionRecord;
use crate::registration_backend::sinks::{
    RegistrationOutcome, RegistrationSink, SpreadsheetOutcome, SpreadsheetSink,
};

/// Which sinks a deployment writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    pub registration_api: bool,
    pub spreadsheet: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            registration_api: true,
            spreadsheet: true,
        }
    }
}

/// Per-sink results of one dispatch. `None` means the sink was disabled and
/// never contacted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub registration: Option<RegistrationOutcome>,
    pub spreadsheet: Option<SpreadsheetOutcome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeOutcome {
    Both,
    RegistrationOnly { spreadsheet_failed: bool },
    SpreadsheetOnly { registration_failed: bool },
    Failed,
}

impl DispatchReport {
    pub fn outcome(&self) -> CompositeOutcome {
        let saved_db = matches!(self.registration, Some(RegistrationOutcome::Success));
        let saved_sheet = matches!(self.spreadsheet, Some(SpreadsheetOutcome::Dispatched));

        match (saved_db, saved_sheet) {
            (true, true) => CompositeOutcome::Both,
            (true, false) => CompositeOutcome::RegistrationOnly {
                spreadsheet_failed: self.spreadsheet.is_some(),
            },
            (false, true) => CompositeOutcome::SpreadsheetOnly {
                registration_failed: self.registration.is_some(),
            },
            (false, false) => CompositeOutcome::Failed,
        }
    }
}

impl CompositeOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, CompositeOutcome::Failed)
    }

    /// The one message shown to the user for this submission.
    pub fn message(&self) -> String {
        match self {
            CompositeOutcome::Both => {
                "Registration successful! Data saved to both database and Google Sheets."
                    .to_string()
            }
            CompositeOutcome::RegistrationOnly { spreadsheet_failed } => {
                let mut msg = "Registration successful! Data saved to database only.".to_string();
                if *spreadsheet_failed {
                    msg.push_str(" Google Sheets save failed.");
                }
                msg
            }
            CompositeOutcome::SpreadsheetOnly { registration_failed } => {
                let mut msg =
                    "Registration successful! Data saved to Google Sheets only.".to_string();
                if *registration_failed {
                    msg.push_str(" Database save failed.");
                }
                msg
            }
            CompositeOutcome::Failed => {
                "Error submitting registration. Please try again.".to_string()
            }
        }
    }
}

/// Sends one record to every enabled sink. Attempts run concurrently and
/// each yields a value, so one sink failing never skips the other. A sink
/// that hangs is cut off by its client's request timeout. No retries.
pub struct DualWriteDispatcher {
    config: SinkConfig,
    registration: Arc<dyn RegistrationSink>,
    spreadsheet: Arc<dyn SpreadsheetSink>,
}

impl DualWriteDispatcher {
    pub fn new(
        config: SinkConfig,
        registration: Arc<dyn RegistrationSink>,
        spreadsheet: Arc<dyn SpreadsheetSink>,
    ) -> Self {
        Self {
            config,
            registration,
            spreadsheet,
        }
    }

    pub async fn dispatch(&self, record: &SubmissionRecord) -> DispatchReport {
        let registration = async {
            if self.config.registration_api {
                Some(self.registration.register(record).await)
            } else {
                None
            }
        };
        let spreadsheet = async {
            if self.config.spreadsheet {
                Some(self.spreadsheet.append(record).await)
            } else {
                None
            }
        };

        let (registration, spreadsheet) = tokio::join!(registration, spreadsheet);
        let report = DispatchReport { registration, spreadsheet };

        match report.outcome() {
            CompositeOutcome::Both => info!(
                "Submission {} saved to {} and {}",
                record.id,
                self.registration.name(),
                self.spreadsheet.name()
            ),
            CompositeOutcome::Failed => {
                error!("Failed to save submission {} to any location", record.id)
            }
            degraded => warn!("Submission {} partially saved: {:?}", record.id, degraded),
        }

        report
    }
}
