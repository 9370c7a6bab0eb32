use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use base64::Engine;
use futures::FutureExt;

use crate::models::identity::{ExtractedName, VerificationResult, VerificationSource};
use crate::services::extraction;
use crate::services::local_ocr::LocalOcr;
use crate::services::remote_ocr::{RemoteOcr, RemoteOcrReply};

const DEFAULT_LANGUAGE: &str = "eng";

/// Reads an uploaded ID and checks it for the required locality.
///
/// Tries the remote OCR proxy once; on any failure runs the local engine once.
/// Never returns an error: when both backends fail the result has `ok == false`.
pub struct IdentityVerifier {
    remote: Arc<dyn RemoteOcr>,
    local: Arc<dyn LocalOcr>,
    language: String,
}

impl IdentityVerifier {
    pub fn new(remote: Arc<dyn RemoteOcr>, local: Arc<dyn LocalOcr>) -> Self {
        Self {
            remote,
            local,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn remote(&self) -> &dyn RemoteOcr {
        self.remote.as_ref()
    }

    pub fn local(&self) -> &dyn LocalOcr {
        self.local.as_ref()
    }

    /// Verify `image` against `required_locality`.
    pub async fn verify(&self, image: &[u8], required_locality: &str) -> VerificationResult {
        let start = Instant::now();

        let result = AssertUnwindSafe(self.run(image, required_locality))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                tracing::error!("OCR backend panicked during verification");
                VerificationResult::unavailable()
            });

        let source: &'static str = result.source.into();
        metrics::counter!("id_verifications_total", "source" => source).increment(1);
        metrics::histogram!("id_verification_seconds").record(start.elapsed().as_secs_f64());

        tracing::info!(
            source,
            ok = result.ok,
            has_required_locality = result.has_required_locality,
            duration_ms = start.elapsed().as_millis() as u64,
            "ID verification complete"
        );

        result
    }

    async fn run(&self, image: &[u8], required_locality: &str) -> VerificationResult {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);

        match self.remote.recognize(&encoded).await {
            Ok(reply) => from_remote(reply),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    endpoint = self.remote.endpoint(),
                    "Remote OCR failed, falling back to local engine"
                );
                metrics::counter!("id_verification_fallbacks_total").increment(1);
                self.verify_locally(image, required_locality).await
            }
        }
    }

    async fn verify_locally(&self, image: &[u8], required_locality: &str) -> VerificationResult {
        match self.local.recognize(image, &self.language).await {
            Ok(output) => from_local_text(output.text.unwrap_or_default(), required_locality),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    engine = self.local.name(),
                    "Local OCR failed, verification unavailable"
                );
                VerificationResult::unavailable()
            }
        }
    }
}

/// The proxy's `hasMatch` is trusted as-is; it applies its own normalization.
fn from_remote(reply: RemoteOcrReply) -> VerificationResult {
    VerificationResult {
        ok: true,
        has_required_locality: reply.has_match,
        extracted_name: ExtractedName::new(reply.first_name, reply.middle_name, reply.last_name),
        full_text: reply.full_text,
        source: VerificationSource::Remote,
    }
}

fn from_local_text(text: String, required_locality: &str) -> VerificationResult {
    VerificationResult {
        ok: true,
        has_required_locality: extraction::contains_locality(&text, required_locality),
        extracted_name: extraction::extract_name(&text),
        full_text: text,
        source: VerificationSource::Local,
    }
}
