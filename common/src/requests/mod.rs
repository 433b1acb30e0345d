//! JSON bodies exchanged between the browser client and the backend.
//! Field names are camelCase on the wire.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::membership::MembershipForm;
use crate::model::submission::{Submission, SubmissionStatus};

/// Body of `POST /api/submissions/save`: the record plus the signature that
/// was printed on the exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSubmissionRequest {
    #[serde(flatten)]
    pub form: MembershipForm,
    #[serde(default)]
    pub signature_data_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hkf_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub success: bool,
    #[serde(default)]
    pub submissions: Vec<Submission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `POST /api/submissions/update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub id: i64,
    /// Parsed strictly: an unknown status is a malformed request, not a
    /// reset to pending.
    #[serde(deserialize_with = "strict_status")]
    pub status: SubmissionStatus,
    #[serde(default)]
    pub comments: String,
}

fn strict_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SubmissionStatus, D::Error> {
    let raw = String::deserialize(deserializer)?;
    SubmissionStatus::parse(&raw).ok_or_else(|| D::Error::custom(format!("unknown status '{}'", raw)))
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// What the Document Reconstructor needs to print one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    pub form: MembershipForm,
    #[serde(default)]
    pub signature_data_url: Option<String>,
    #[serde(default)]
    pub hkf_id: Option<String>,
}
