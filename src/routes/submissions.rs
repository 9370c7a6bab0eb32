use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::app_state::AppState;
use crate::models::form::SessionKey;
use crate::models::verification::SubmissionCheckRequest;
use crate::services::gate::GateDecision;

/// POST /api/v1/submissions/check — May this form be submitted now?
///
/// Blocked submissions answer 422 so form handlers can branch on status alone.
pub async fn check_submission(
    State(state): State<AppState>,
    Json(request): Json<SubmissionCheckRequest>,
) -> (StatusCode, Json<GateDecision>) {
    let key = SessionKey::new(request.session_id, request.form);
    let stored = state.store.latest(key).await;
    let decision = state.gate.decide(stored.as_ref().map(|s| &s.result));

    let status = if decision.is_allowed() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    tracing::info!(
        session_id = %request.session_id,
        form = %request.form,
        allowed = decision.is_allowed(),
        "Submission gate checked"
    );

    (status, Json(decision))
}
