use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// Portal request forms that require an ID check before submission.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FormKind {
    BarangayId,
    BarangayClearance,
    CertificateOfResidency,
    CertificateOfIndigency,
    BusinessClearance,
}

/// Identifies one form within one resident session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub session_id: Uuid,
    pub form: FormKind,
}

impl SessionKey {
    pub fn new(session_id: Uuid, form: FormKind) -> Self {
        Self { session_id, form }
    }
}
