use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use log::{error, info};
use tokio::time::sleep;

use crate::registration_backend::lookup::client::{CustomerLookup, LookupOutcome};
use crate::registration_backend::record::types::CustomerLookupResult;

pub const AUTOFILL_LABEL: &str = "Auto Fill";
pub const SEARCHING_LABEL: &str = "Searching...";

const PHONE_LENGTH: usize = 10;

/// Fields a returning customer gets pre-filled. Address and password are
/// never filled back in.
#[derive(Debug, Clone, PartialEq)]
pub struct FormPrefill {
    pub full_name: String,
    pub email: String,
    pub gender: String,
    pub dob: Option<NaiveDate>,
}

impl From<&CustomerLookupResult> for FormPrefill {
    fn from(customer: &CustomerLookupResult) -> Self {
        // stored dates may carry a time part
        let dob = customer
            .dob
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        Self {
            full_name: customer.full_name.clone(),
            email: customer.email.clone(),
            gender: customer.gender.clone(),
            dob,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AutofillState {
    Idle,
    Searching,
    Filled(FormPrefill),
    NotFound,
    Error(String),
}

impl AutofillState {
    pub fn label(&self) -> &'static str {
        match self {
            AutofillState::Searching => SEARCHING_LABEL,
            _ => AUTOFILL_LABEL,
        }
    }
}

pub trait AutofillView: Send + Sync {
    fn show(&self, state: &AutofillState);
}

/// Idle -> Searching -> {Filled, NotFound, Error} -> Idle, with the
/// terminal state held for `display_delay`.
pub struct Autofill {
    lookup: Arc<dyn CustomerLookup>,
    display_delay: Duration,
}

impl Autofill {
    pub fn new(lookup: Arc<dyn CustomerLookup>, display_delay: Duration) -> Self {
        Self { lookup, display_delay }
    }

    /// Returns the state that was displayed before going back to idle.
    pub async fn run(&self, phone: &str, view: &dyn AutofillView) -> AutofillState {
        let settled = if phone.chars().count() != PHONE_LENGTH {
            AutofillState::Error(format!("Phone number must be {} digits", PHONE_LENGTH))
        } else {
            view.show(&AutofillState::Searching);
            match self.lookup.find_by_phone(phone).await {
                Ok(LookupOutcome::Found(customer)) => {
                    info!("Auto-filled customer {}", customer.id);
                    AutofillState::Filled(FormPrefill::from(&customer))
                }
                Ok(LookupOutcome::NotFound) => AutofillState::NotFound,
                Err(e) => {
                    error!("Error fetching customer data: {}", e);
                    AutofillState::Error(e)
                }
            }
        };

        view.show(&settled);
        sleep(self.display_delay).await;
        view.show(&AutofillState::Idle);

        settled
    }
}
