use log::{error, info};
use thiserror::Error;

use crate::registration_backend::dispatch::dispatcher::{
    CompositeOutcome, DispatchReport, DualWriteDispatcher,
};
use crate::registration_backend::record::builder::{build_record, SubmissionStamp};
use crate::registration_backend::record::capture::{DeviceContext, FormFields};
use crate::registration_backend::record::types::SubmissionRecord;

pub const SUBMIT_LABEL: &str = "Complete Registration";
pub const SUBMITTING_LABEL: &str = "Submitting...";

/// The submit button and the alert box of whatever front end drives the form.
pub trait SubmitControl: Send + Sync {
    fn set_enabled(&self, enabled: bool, label: &str);
    fn notify(&self, message: &str);
}

/// Keeps the submit control disabled for as long as it lives. Dropping it,
/// on any path including unwinding, re-enables the control.
pub struct SubmitGuard<'a> {
    control: &'a dyn SubmitControl,
}

impl<'a> SubmitGuard<'a> {
    pub fn engage(control: &'a dyn SubmitControl) -> Self {
        control.set_enabled(false, SUBMITTING_LABEL);
        Self { control }
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.control.set_enabled(true, SUBMIT_LABEL);
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Passwords do not match!")]
    PasswordMismatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub record: SubmissionRecord,
    pub report: DispatchReport,
    pub outcome: CompositeOutcome,
}

/// Form-side submission flow: gate, build, dispatch, report once.
pub struct RegistrationForm {
    dispatcher: DualWriteDispatcher,
    device: DeviceContext,
}

impl RegistrationForm {
    pub fn new(dispatcher: DualWriteDispatcher, device: DeviceContext) -> Self {
        Self { dispatcher, device }
    }

    pub async fn submit(
        &self,
        fields: &FormFields,
        control: &dyn SubmitControl,
    ) -> Result<Submission, SubmitError> {
        self.submit_stamped(fields, control, SubmissionStamp::now()).await
    }

    pub async fn submit_stamped(
        &self,
        fields: &FormFields,
        control: &dyn SubmitControl,
        stamp: SubmissionStamp,
    ) -> Result<Submission, SubmitError> {
        if !fields.passwords_match() {
            let err = SubmitError::PasswordMismatch;
            control.notify(&err.to_string());
            return Err(err);
        }

        let _guard = SubmitGuard::engage(control);

        let record = build_record(fields, &self.device, stamp);
        let report = self.dispatcher.dispatch(&record).await;
        let outcome = report.outcome();

        if outcome.is_success() {
            info!("Registration {} finished: {:?}", record.id, outcome);
        } else {
            error!("Error during form submission: failed to save data to any location");
        }
        control.notify(&outcome.message());

        Ok(Submission { record, report, outcome })
    }
}
