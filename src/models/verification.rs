use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::form::FormKind;
use crate::models::identity::VerificationResult;
use crate::services::gate::GateDecision;

/// Text fields accompanying an ID upload (multipart portion).
#[derive(Debug, Default, Deserialize, Validate)]
pub struct VerificationForm {
    #[garde(length(min = 32, max = 36))]
    pub session_id: String,

    #[garde(length(min = 1, max = 64))]
    pub form: String,
}

/// Response after verifying an uploaded ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerificationResponse {
    pub session_id: Uuid,
    pub form: FormKind,
    pub upload_seq: u64,
    /// False when a newer upload for the same form superseded this one.
    pub accepted: bool,
    pub result: VerificationResult,
    pub decision: GateDecision,
}

/// Latest verification held for a session's form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredVerification {
    pub upload_seq: u64,
    pub result: VerificationResult,
    pub verified_at: DateTime<Utc>,
}

/// Request to check whether a form may be submitted.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionCheckRequest {
    pub session_id: Uuid,
    pub form: FormKind,
}
