use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Raw recognition output. `text` may be absent; callers treat that as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalOcrText {
    pub text: Option<String>,
}

/// In-process fallback recognition engine.
#[async_trait]
pub trait LocalOcr: Send + Sync {
    /// Engine identifier for logs and health output.
    fn name(&self) -> &'static str;

    /// Whether lazy initialization has already completed.
    fn is_ready(&self) -> bool {
        true
    }

    /// Recognize text in the original upload bytes using `language`.
    async fn recognize(&self, image: &[u8], language: &str) -> Result<LocalOcrText, LocalOcrError>;
}

/// Where to find the Tesseract binary and its language data.
#[derive(Debug, Clone)]
pub struct TesseractConfig {
    pub binary: String,
    pub tessdata_dir: Option<PathBuf>,
    /// Base URL serving `<lang>.traineddata`, used when the file is missing locally.
    pub tessdata_url: Option<String>,
    /// Upper bound for fetching one language data file.
    pub download_timeout: Duration,
    /// Upper bound for one `tesseract` invocation, including the version check.
    pub recognize_timeout: Duration,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            tessdata_dir: None,
            tessdata_url: None,
            download_timeout: Duration::from_secs(60),
            recognize_timeout: Duration::from_secs(30),
        }
    }
}

/// Local OCR backed by the `tesseract` command-line engine.
///
/// The binary is checked on first use rather than at construction, so a host
/// without Tesseract still serves the remote path. A failed check is retried
/// on the next call.
pub struct TesseractEngine {
    config: TesseractConfig,
    http: reqwest::Client,
    ready: AtomicBool,
    init_lock: Mutex<()>,
}

impl TesseractEngine {
    pub fn new(config: TesseractConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            ready: AtomicBool::new(false),
            init_lock: Mutex::new(()),
        }
    }

    async fn ensure_ready(&self, language: &str) -> Result<(), LocalOcrError> {
        if !self.ready.load(Ordering::Acquire) {
            let _guard = self.init_lock.lock().await;
            if !self.ready.load(Ordering::Acquire) {
                self.check_binary().await?;
                self.ready.store(true, Ordering::Release);
            }
        }

        if let Some(dir) = &self.config.tessdata_dir {
            let _guard = self.init_lock.lock().await;
            self.ensure_language_data(dir, language).await?;
        }

        Ok(())
    }

    async fn check_binary(&self) -> Result<(), LocalOcrError> {
        let mut command = Command::new(&self.config.binary);
        command.arg("--version").stdin(Stdio::null()).kill_on_drop(true);
        let output = self.output_within_timeout(&mut command).await?;

        if !output.status.success() {
            return Err(LocalOcrError::Unavailable(format!(
                "{} --version exited with {}",
                self.config.binary, output.status
            )));
        }

        // Older releases print the version banner on stderr.
        let banner = if output.stdout.is_empty() {
            String::from_utf8_lossy(&output.stderr).into_owned()
        } else {
            String::from_utf8_lossy(&output.stdout).into_owned()
        };
        tracing::info!(
            engine = "tesseract",
            version = %banner.lines().next().unwrap_or("unknown"),
            "Local OCR engine initialized"
        );
        Ok(())
    }

    async fn ensure_language_data(&self, dir: &Path, language: &str) -> Result<(), LocalOcrError> {
        let target = dir.join(format!("{language}.traineddata"));
        if tokio::fs::try_exists(&target).await? {
            return Ok(());
        }

        let base = self.config.tessdata_url.as_deref().ok_or_else(|| {
            LocalOcrError::Unavailable(format!("{} is missing", target.display()))
        })?;
        let url = format!("{}/{language}.traineddata", base.trim_end_matches('/'));

        tracing::info!(url = %url, path = %target.display(), "Downloading OCR language data");
        let bytes = self
            .http
            .get(&url)
            .timeout(self.config.download_timeout)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        tokio::fs::create_dir_all(dir).await?;
        let partial = dir.join(format!("{language}.traineddata.{}.part", Uuid::new_v4()));
        tokio::fs::write(&partial, &bytes).await?;
        tokio::fs::rename(&partial, &target).await?;
        Ok(())
    }

    async fn run(&self, input: &Path, language: &str) -> Result<LocalOcrText, LocalOcrError> {
        let mut command = Command::new(&self.config.binary);
        command.arg(input).arg("stdout").arg("-l").arg(language);
        if let Some(dir) = &self.config.tessdata_dir {
            command.arg("--tessdata-dir").arg(dir);
        }

        command.stdin(Stdio::null()).kill_on_drop(true);
        let output = self.output_within_timeout(&mut command).await?;

        if !output.status.success() {
            return Err(LocalOcrError::Recognition(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(LocalOcrText {
            text: Some(String::from_utf8_lossy(&output.stdout).into_owned()),
        })
    }

    /// Stage `image` at `input`, recognize it, and remove the file whatever happened.
    async fn recognize_at(
        &self,
        input: &Path,
        image: &[u8],
        language: &str,
    ) -> Result<LocalOcrText, LocalOcrError> {
        let result = match tokio::fs::write(input, image).await {
            Ok(()) => self.run(input, language).await,
            Err(e) => Err(e.into()),
        };

        remove_temp_file(input).await;
        result
    }

    /// Run `command` to completion; on expiry the child is killed when its future drops.
    async fn output_within_timeout(
        &self,
        command: &mut Command,
    ) -> Result<std::process::Output, LocalOcrError> {
        let limit = self.config.recognize_timeout;
        match tokio::time::timeout(limit, command.output()).await {
            Ok(output) => Ok(output?),
            Err(_) => Err(LocalOcrError::Timeout(limit)),
        }
    }
}

#[async_trait]
impl LocalOcr for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    async fn recognize(&self, image: &[u8], language: &str) -> Result<LocalOcrText, LocalOcrError> {
        if !is_valid_language(language) {
            return Err(LocalOcrError::UnsupportedLanguage(language.to_string()));
        }
        self.ensure_ready(language).await?;

        let input = std::env::temp_dir().join(format!("id-verify-{}.img", Uuid::new_v4()));
        self.recognize_at(&input, image, language).await
    }
}

/// Best-effort removal; a write that failed early may have left a partial file.
async fn remove_temp_file(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove OCR temp file");
        }
    }
}

/// Tesseract language codes: `eng`, `chi_sim`, or `eng+fil`.
fn is_valid_language(language: &str) -> bool {
    !language.is_empty()
        && language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '+')
}

#[derive(Debug, thiserror::Error)]
pub enum LocalOcrError {
    #[error("I/O error running local OCR: {0}")]
    Io(#[from] std::io::Error),

    #[error("Local OCR engine unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to download OCR language data: {0}")]
    Download(#[from] reqwest::Error),

    #[error("Local OCR recognition failed: {0}")]
    Recognition(String),

    #[error("Unsupported OCR language code: {0}")]
    UnsupportedLanguage(String),

    #[error("Local OCR timed out after {0:?}")]
    Timeout(Duration),
}
