use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub required_locality: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub remote_ocr: ComponentHealth,
    pub local_ocr: ComponentHealth,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: String,
    pub detail: String,
}

/// GET /health — reports configuration of both OCR backends.
///
/// The remote proxy is not called; every call would be a billed vision request.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let remote = state.verifier.remote();
    let local = state.verifier.local();

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        required_locality: state.gate.required_locality().to_string(),
        checks: HealthChecks {
            remote_ocr: ComponentHealth {
                status: "configured".to_string(),
                detail: remote.endpoint().to_string(),
            },
            local_ocr: ComponentHealth {
                status: (if local.is_ready() { "ready" } else { "lazy" }).to_string(),
                detail: local.name().to_string(),
            },
        },
    })
}
