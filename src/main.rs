use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;

use barangay_id_verify::app_state::AppState;
use barangay_id_verify::config::AppConfig;
use barangay_id_verify::routes;
use barangay_id_verify::services::{
    gate::SubmissionGate,
    local_ocr::TesseractEngine,
    remote_ocr::RemoteOcrClient,
    session::VerificationStore,
    verifier::IdentityVerifier,
};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!(
        required_locality = %config.required_locality,
        "Initializing barangay-id-verify server"
    );

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);
    routes::metrics::describe();

    tracing::info!(endpoint = %config.remote_ocr_url, "Initializing remote OCR client");
    let remote = RemoteOcrClient::new(&config.remote_ocr_url, config.remote_timeout())
        .expect("Failed to initialize remote OCR client");

    // Tesseract is checked lazily on the first fallback
    let local = TesseractEngine::new(config.tesseract_config());

    let verifier = IdentityVerifier::new(Arc::new(remote), Arc::new(local))
        .with_language(&config.ocr_language);

    let state = AppState::new(
        verifier,
        VerificationStore::with_ttl(config.session_ttl()),
        SubmissionGate::new(&config.required_locality),
        config.max_upload_bytes,
    );

    // Sweep abandoned form sessions
    let store = state.store.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(store.ttl() / 2);
        loop {
            interval.tick().await;
            store.evict_expired().await;
        }
    });

    let app = routes::router(state, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
