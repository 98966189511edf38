//! Wire types for the linking service and the gate endpoints.

use disclose_core::{
    FailedCheck, SubjectId, ValidityDetails, VerificationConfig, VerificationOptions,
    VerificationRequest,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `/saveOptions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveOptionsRequest {
    #[serde(rename = "subjectId", alias = "userId")]
    pub subject_id: SubjectId,
    pub options: VerificationConfig,
}

/// Deferred-linking exchange, in the linking service's field names.
///
/// Also accepts the camelCase names `campaignId`, `campaignSubjectId`,
/// `serializedRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredLinkRequest {
    #[serde(alias = "campaignId")]
    pub campaign_id: String,
    #[serde(alias = "campaignSubjectId")]
    pub campaign_user_id: String,
    /// JSON-serialized `VerificationRequest`.
    #[serde(alias = "serializedRequest")]
    pub self_app: String,
}

impl DeferredLinkRequest {
    /// Exchange request for `request`, using its scope as the campaign.
    pub fn for_request(request: &VerificationRequest) -> Self {
        Self {
            campaign_id: request.scope.clone(),
            campaign_user_id: request.user_id.to_string(),
            self_app: request.to_json(),
        }
    }
}

/// `{ "data": token }`. An empty string means no token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub data: String,
}

/// Successful `/verify` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifySuccess {
    pub status: String,
    pub result: bool,
    pub credential_subject: Map<String, Value>,
    pub verification_options: VerificationOptions,
}

/// Negative `/verify` reply naming the failed check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyFailure {
    pub status: String,
    pub result: bool,
    pub message: String,
    pub failed_check: FailedCheck,
    pub details: ValidityDetails,
}

/// Either `/verify` outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyResponse {
    Success(VerifySuccess),
    Failure(VerifyFailure),
}

/// Reply of `/v1/request`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPreview {
    pub request: VerificationRequest,
    pub link: String,
    pub digest: String,
}
