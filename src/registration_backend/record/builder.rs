use chrono::{DateTime, Utc};

use crate::registration_backend::record::capture::{DeviceContext, FormFields};
use crate::registration_backend::record::types::{DeviceInfo, SubmissionRecord};

/// Identifier and timestamp assigned to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionStamp {
    pub id: i64,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionStamp {
    /// Millisecond wall-clock id. Two clients submitting in the same
    /// millisecond get the same id; nothing here detects that.
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(submitted_at: DateTime<Utc>) -> Self {
        Self {
            id: submitted_at.timestamp_millis(),
            submitted_at,
        }
    }
}

/// Assembles the canonical record. Callers gate on
/// [`FormFields::passwords_match`] before getting here.
pub fn build_record(
    fields: &FormFields,
    device: &DeviceContext,
    stamp: SubmissionStamp,
) -> SubmissionRecord {
    SubmissionRecord {
        id: stamp.id,
        full_name: fields.full_name.clone(),
        email: fields.email.clone(),
        phone: fields.phone.clone(),
        gender: fields.gender.clone(),
        dob: fields.dob,
        address: fields.address.clone(),
        password: fields.password.clone(),
        latitude: fields.position.map(|p| p.latitude),
        longitude: fields.position.map(|p| p.longitude),
        device_info: DeviceInfo {
            user_agent: device.user_agent.clone(),
            platform: device.platform.clone(),
            screen_resolution: device.screen_resolution(),
        },
        submission_date: stamp.submitted_at,
    }
}
