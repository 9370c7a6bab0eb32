use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Best-effort name read off an ID. Fields are empty when undetermined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedName {
    pub first: String,
    pub middle: String,
    pub last: String,
}

impl ExtractedName {
    pub fn new(first: impl Into<String>, middle: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            middle: middle.into(),
            last: last.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.middle.is_empty() && self.last.is_empty()
    }
}

/// Which backend produced a verification result.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VerificationSource {
    Remote,
    Local,
    None,
}

/// Outcome of reading an uploaded ID image.
///
/// `ok` is false only when neither backend could extract text; in that case
/// every other field is empty/false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub ok: bool,
    pub has_required_locality: bool,
    pub extracted_name: ExtractedName,
    pub full_text: String,
    pub source: VerificationSource,
}

impl VerificationResult {
    /// Neither backend produced text.
    pub fn unavailable() -> Self {
        Self {
            ok: false,
            has_required_locality: false,
            extracted_name: ExtractedName::default(),
            full_text: String::new(),
            source: VerificationSource::None,
        }
    }

    /// The caller should block submission: text was read but the locality is absent.
    pub fn is_locality_mismatch(&self) -> bool {
        self.ok && !self.has_required_locality
    }
}
