use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Text and name fields read by the remote OCR proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteOcrReply {
    pub full_text: String,
    /// The proxy's own locality match, computed with its text normalization.
    pub has_match: bool,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
}

/// Primary recognition backend.
#[async_trait]
pub trait RemoteOcr: Send + Sync {
    /// Send a base64-encoded image for recognition. Single attempt.
    async fn recognize(&self, image_base64: &str) -> Result<RemoteOcrReply, RemoteOcrError>;

    /// Where requests go, for health reporting.
    fn endpoint(&self) -> &str;
}

/// Client for the server-side vision/OCR proxy.
pub struct RemoteOcrClient {
    http: Client,
    endpoint: String,
}

#[derive(Serialize)]
struct RemoteOcrRequest<'a> {
    image_base64: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteOcrResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    ok: Option<bool>,
    #[serde(default)]
    full_text: Option<String>,
    #[serde(default)]
    has_match: Option<bool>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    middle_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl RemoteOcrClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RemoteOcrError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("barangay-id-verify/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl RemoteOcr for RemoteOcrClient {
    async fn recognize(&self, image_base64: &str) -> Result<RemoteOcrReply, RemoteOcrError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&RemoteOcrRequest { image_base64 })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteOcrError::Status(status));
        }

        let body = response.text().await?;
        let parsed: RemoteOcrResponse = serde_json::from_str(&body)?;

        if !(parsed.success.unwrap_or(false) && parsed.ok.unwrap_or(false)) {
            return Err(RemoteOcrError::Rejected(
                parsed.error.unwrap_or_else(|| "success/ok flag not set".to_string()),
            ));
        }

        Ok(RemoteOcrReply {
            full_text: parsed.full_text.unwrap_or_default(),
            has_match: parsed.has_match.unwrap_or(false),
            first_name: clean(parsed.first_name),
            middle_name: clean(parsed.middle_name),
            last_name: clean(parsed.last_name),
        })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn clean(field: Option<String>) -> String {
    field.map(|s| s.trim().to_string()).unwrap_or_default()
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteOcrError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote OCR returned status {0}")]
    Status(StatusCode),

    #[error("Failed to parse remote OCR response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Remote OCR reported failure: {0}")]
    Rejected(String),
}
