use std::sync::Arc;

use crate::services::{gate::SubmissionGate, session::VerificationStore, verifier::IdentityVerifier};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<IdentityVerifier>,
    pub store: Arc<VerificationStore>,
    pub gate: Arc<SubmissionGate>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        verifier: IdentityVerifier,
        store: VerificationStore,
        gate: SubmissionGate,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            verifier: Arc::new(verifier),
            store: Arc::new(store),
            gate: Arc::new(gate),
            max_upload_bytes,
        }
    }
}
