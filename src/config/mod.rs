use std::path::PathBuf;
use std::time::Duration;

use garde::Validate;
use serde::Deserialize;

use crate::services::local_ocr::TesseractConfig;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_bind_addr")]
    #[garde(length(min = 1))]
    pub bind_addr: String,

    /// Remote OCR proxy endpoint accepting `{ image_base64 }`
    #[garde(length(min = 1))]
    pub remote_ocr_url: String,

    /// Request timeout for the remote OCR proxy, in seconds
    #[serde(default = "default_remote_timeout")]
    #[garde(range(min = 1, max = 300))]
    pub remote_ocr_timeout_secs: u64,

    /// Place name every verified ID address must contain (e.g., "Bigte")
    #[serde(default = "default_required_locality")]
    #[garde(length(min = 1, max = 100))]
    pub required_locality: String,

    /// Largest accepted upload, in bytes
    #[serde(default = "default_max_upload_bytes")]
    #[garde(range(min = 1, max = 52_428_800))]
    pub max_upload_bytes: usize,

    /// Tesseract executable name or path
    #[serde(default = "default_tesseract_bin")]
    #[garde(length(min = 1))]
    pub tesseract_bin: String,

    /// Directory holding `<lang>.traineddata` files
    #[garde(skip)]
    pub tessdata_dir: Option<PathBuf>,

    /// Base URL to fetch missing `<lang>.traineddata` files from
    #[garde(skip)]
    pub tessdata_url: Option<String>,

    /// Tesseract language code used by the fallback path
    #[serde(default = "default_ocr_language")]
    #[garde(length(min = 1, max = 32))]
    pub ocr_language: String,

    /// Upper bound for one `tesseract` run, in seconds
    #[serde(default = "default_tesseract_timeout")]
    #[garde(range(min = 1, max = 600))]
    pub tesseract_timeout_secs: u64,

    /// Upper bound for fetching one `<lang>.traineddata` file, in seconds
    #[serde(default = "default_tessdata_download_timeout")]
    #[garde(range(min = 1, max = 3600))]
    pub tessdata_download_timeout_secs: u64,

    /// How long an untouched form session keeps its verification result, in seconds
    #[serde(default = "default_session_ttl")]
    #[garde(range(min = 60, max = 86_400))]
    pub session_ttl_secs: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_remote_timeout() -> u64 {
    15
}

fn default_required_locality() -> String {
    "Bigte".to_string()
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_tesseract_bin() -> String {
    "tesseract".to_string()
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

fn default_tesseract_timeout() -> u64 {
    30
}

fn default_tessdata_download_timeout() -> u64 {
    60
}

fn default_session_ttl() -> u64 {
    30 * 60
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        envy::from_env::<Self>()?.normalized()
    }

    /// Build from explicit key/value pairs (same names as the environment).
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Self>(pairs)?.normalized()
    }

    /// Trim free-text values, then validate. A blank locality fails here.
    fn normalized(mut self) -> Result<Self, ConfigError> {
        self.required_locality = self.required_locality.trim().to_string();
        self.validate().map_err(ConfigError::Invalid)?;
        Ok(self)
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_ocr_timeout_secs)
    }

    pub fn tesseract_config(&self) -> TesseractConfig {
        TesseractConfig {
            binary: self.tesseract_bin.clone(),
            tessdata_dir: self.tessdata_dir.clone(),
            tessdata_url: self.tessdata_url.clone(),
            download_timeout: Duration::from_secs(self.tessdata_download_timeout_secs),
            recognize_timeout: Duration::from_secs(self.tesseract_timeout_secs),
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration from environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(garde::Report),
}
