use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Prometheus metrics scrape endpoint.
pub async fn prometheus_metrics(
    axum::extract::State(handle): axum::extract::State<Arc<PrometheusHandle>>,
) -> impl IntoResponse {
    handle.render()
}

/// Register descriptions for the verifier's metrics.
pub fn describe() {
    metrics::describe_counter!(
        "id_verifications_total",
        "ID verifications completed, labelled by the backend that answered"
    );
    metrics::describe_counter!(
        "id_verification_fallbacks_total",
        "Verifications where the remote OCR failed and the local engine ran"
    );
    metrics::describe_histogram!(
        "id_verification_seconds",
        "Time to verify one uploaded ID image"
    );
}
