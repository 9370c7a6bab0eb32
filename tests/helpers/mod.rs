//! Test helpers: a stand-in remote OCR proxy, a fake local engine and an
//! in-process API server
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use reqwest::multipart;
use serde_json::Value;

use barangay_id_verify::app_state::AppState;
use barangay_id_verify::routes;
use barangay_id_verify::services::gate::SubmissionGate;
use barangay_id_verify::services::local_ocr::{LocalOcr, LocalOcrError, LocalOcrText};
use barangay_id_verify::services::remote_ocr::RemoteOcrClient;
use barangay_id_verify::services::session::VerificationStore;
use barangay_id_verify::services::verifier::IdentityVerifier;

use crate::fixtures::LOCALITY;

/// How the stand-in proxy answers.
#[derive(Clone)]
pub enum ProxyBehavior {
    Json(StatusCode, Value),
    Raw(StatusCode, &'static str),
    Slow(Duration, Value),
    /// The first request waits and gets the first reply; later ones get the second at once.
    SlowFirst(Duration, Value, Value),
}

struct ProxyState {
    behavior: ProxyBehavior,
    requests: Mutex<Vec<Value>>,
    served: AtomicUsize,
}

pub struct MockProxy {
    pub url: String,
    state: Arc<ProxyState>,
}

impl MockProxy {
    /// Request bodies received so far.
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn proxy_handler(State(state): State<Arc<ProxyState>>, body: String) -> Response {
    let parsed = serde_json::from_str(&body).unwrap_or(Value::Null);
    state.requests.lock().unwrap().push(parsed);
    let nth = state.served.fetch_add(1, Ordering::SeqCst);

    match &state.behavior {
        ProxyBehavior::Json(status, value) => (*status, Json(value.clone())).into_response(),
        ProxyBehavior::Raw(status, text) => (*status, *text).into_response(),
        ProxyBehavior::Slow(delay, value) => {
            tokio::time::sleep(*delay).await;
            Json(value.clone()).into_response()
        }
        ProxyBehavior::SlowFirst(delay, first, rest) => {
            if nth == 0 {
                tokio::time::sleep(*delay).await;
                Json(first.clone()).into_response()
            } else {
                Json(rest.clone()).into_response()
            }
        }
    }
}

/// Start a remote OCR proxy on an ephemeral port.
pub async fn spawn_proxy(behavior: ProxyBehavior) -> MockProxy {
    let state = Arc::new(ProxyState {
        behavior,
        requests: Mutex::new(Vec::new()),
        served: AtomicUsize::new(0),
    });
    let app = Router::new()
        .route("/ocr", post(proxy_handler))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockProxy {
        url: format!("http://{addr}/ocr"),
        state,
    }
}

/// A URL nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/ocr")
}

/// Local engine returning canned text, or failing like an engine that cannot load.
pub struct FakeLocalOcr {
    text: Option<String>,
    pub calls: AtomicUsize,
}

impl FakeLocalOcr {
    pub fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            text: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocalOcr for FakeLocalOcr {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn recognize(&self, _image: &[u8], language: &str) -> Result<LocalOcrText, LocalOcrError> {
        assert_eq!(language, "eng");
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.text {
            Some(text) => Ok(LocalOcrText {
                text: Some(text.clone()),
            }),
            None => Err(LocalOcrError::Unavailable("engine assets failed to load".into())),
        }
    }
}

/// Verifier wired to a real HTTP client pointed at `remote_url`.
pub fn verifier(remote_url: &str, local: Arc<FakeLocalOcr>) -> IdentityVerifier {
    let remote = RemoteOcrClient::new(remote_url, Duration::from_millis(500))
        .expect("Failed to build remote OCR client");
    IdentityVerifier::new(Arc::new(remote), local)
}

/// Start the API on an ephemeral port and return its base URL.
pub async fn spawn_app(verifier: IdentityVerifier, max_upload_bytes: usize) -> String {
    let state = AppState::new(
        verifier,
        VerificationStore::new(),
        SubmissionGate::new(LOCALITY),
        max_upload_bytes,
    );
    let prometheus = Arc::new(PrometheusBuilder::new().build_recorder().handle());
    let app = routes::router(state, prometheus);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// Upload an ID image the way the portal's form handler does.
pub async fn upload_id(
    client: &reqwest::Client,
    base_url: &str,
    session_id: &str,
    form: &str,
    image: Vec<u8>,
) -> reqwest::Response {
    let form = multipart::Form::new()
        .text("session_id", session_id.to_string())
        .text("form", form.to_string())
        .part(
            "image",
            multipart::Part::bytes(image)
                .file_name("id.png")
                .mime_str("image/png")
                .unwrap(),
        );

    client
        .post(format!("{base_url}/api/v1/verifications"))
        .multipart(form)
        .send()
        .await
        .expect("Upload request failed")
}
