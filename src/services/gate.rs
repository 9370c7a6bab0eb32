use serde::{Deserialize, Serialize};

use crate::models::identity::VerificationResult;

/// What the portal should do with a form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    Allow,
    /// Verification could not run; submission proceeds and the gap is logged.
    AllowUnverified { reason: String },
    Block { message: String },
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, GateDecision::Block { .. })
    }
}

/// Submission policy applied to the latest ID verification of a form.
#[derive(Debug, Clone)]
pub struct SubmissionGate {
    required_locality: String,
}

impl SubmissionGate {
    pub fn new(required_locality: impl Into<String>) -> Self {
        Self {
            required_locality: required_locality.into(),
        }
    }

    pub fn required_locality(&self) -> &str {
        &self.required_locality
    }

    pub fn decide(&self, result: Option<&VerificationResult>) -> GateDecision {
        match result {
            None => GateDecision::Block {
                message: "Upload a valid ID before submitting.".to_string(),
            },
            Some(r) if !r.ok => {
                tracing::warn!("ID verification unavailable, allowing unverified submission");
                GateDecision::AllowUnverified {
                    reason: "ID verification is temporarily unavailable.".to_string(),
                }
            }
            Some(r) if r.is_locality_mismatch() => GateDecision::Block {
                message: format!(
                    "The uploaded ID must show an address in {}. Please upload an ID issued to a resident of {}.",
                    self.required_locality, self.required_locality
                ),
            },
            Some(_) => GateDecision::Allow,
        }
    }
}
