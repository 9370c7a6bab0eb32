use std::str::FromStr;

use axum::extract::{Multipart, Path, State};
use axum::Json;
use garde::Validate;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::models::form::{FormKind, SessionKey};
use crate::models::verification::{StoredVerification, VerificationForm, VerificationResponse};
use crate::routes::error::ApiError;
use crate::services::upload;

/// POST /api/v1/verifications — Upload an ID image and verify its locality.
pub async fn submit_verification(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<VerificationResponse>, ApiError> {
    let mut image_data = None;
    let mut form = VerificationForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("image") => image_data = Some(field.bytes().await?),
            Some("session_id") => form.session_id = field.text().await?.trim().to_string(),
            Some("form") => form.form = field.text().await?.trim().to_string(),
            _ => {}
        }
    }

    form.validate().map_err(|report| ApiError::Invalid(report.to_string()))?;
    let session_id =
        Uuid::parse_str(&form.session_id).map_err(|e| ApiError::Invalid(e.to_string()))?;
    let form_kind = FormKind::from_str(&form.form)
        .map_err(|_| ApiError::Invalid(format!("unknown form: {}", form.form)))?;

    let image_data = image_data.ok_or(ApiError::MissingField("image"))?;
    let format = upload::check_upload(&image_data, state.max_upload_bytes)?;

    let key = SessionKey::new(session_id, form_kind);
    let upload_seq = state.store.begin_upload(key).await;

    tracing::info!(
        session_id = %session_id,
        form = %form_kind,
        upload_seq,
        bytes = image_data.len(),
        format = ?format,
        "Verifying uploaded ID"
    );

    let result = state
        .verifier
        .verify(&image_data, state.gate.required_locality())
        .await;
    let accepted = state.store.record(key, upload_seq, result.clone()).await;

    // A superseded result says nothing about submission; report what the gate sees now.
    let latest = state.store.latest(key).await;
    let decision = state.gate.decide(latest.as_ref().map(|stored| &stored.result));

    Ok(Json(VerificationResponse {
        session_id,
        form: form_kind,
        upload_seq,
        accepted,
        result,
        decision,
    }))
}

/// GET /api/v1/verifications/{session_id}/{form} — Latest result for a form.
pub async fn get_latest(
    State(state): State<AppState>,
    Path((session_id, form)): Path<(Uuid, FormKind)>,
) -> Result<Json<StoredVerification>, ApiError> {
    state
        .store
        .latest(SessionKey::new(session_id, form))
        .await
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// DELETE /api/v1/verifications/{session_id} — Forget every form of a session.
pub async fn clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Json<Value> {
    let removed = state.store.clear_session(session_id).await;
    tracing::info!(session_id = %session_id, removed, "Cleared verification session");
    Json(json!({ "session_id": session_id, "removed": removed }))
}
