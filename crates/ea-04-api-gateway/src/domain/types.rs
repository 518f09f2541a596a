//! Request and response bodies.
//!
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use ea_01_code_registry::{CodePurpose, VerificationCode};
use ea_03_entitlement::{ActivationResult, InactiveReason, SubscriptionSnapshot};
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, SubscriptionLevel, Timestamp};

/// Envelope for every JSON response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn failure(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

pub fn to_datetime(ts: Timestamp) -> Option<DateTime<Utc>> {
    i64::try_from(ts)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}

/// Desktop client status poll result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub is_active: bool,
    pub level: Option<SubscriptionLevel>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub reason: Option<InactiveReason>,
    pub error_message: Option<String>,
}

impl StatusResponse {
    pub fn from_snapshot(snapshot: &SubscriptionSnapshot) -> Self {
        Self {
            is_active: snapshot.is_active,
            level: snapshot.level,
            expiration_date: snapshot.expiration_date.and_then(to_datetime),
            reason: snapshot.reason,
            error_message: snapshot.reason.map(|r| r.message().to_string()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_active: false,
            level: None,
            expiration_date: None,
            reason: None,
            error_message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateRequest {
    pub activation_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationResponse {
    pub account_id: AccountId,
    pub is_active: bool,
    pub level: Option<SubscriptionLevel>,
    pub expiration_date: Option<DateTime<Utc>>,
}

impl From<&ActivationResult> for ActivationResponse {
    fn from(result: &ActivationResult) -> Self {
        Self {
            account_id: result.account_id.clone(),
            is_active: result.snapshot.is_active,
            level: result.snapshot.level,
            expiration_date: result.snapshot.expiration_date.and_then(to_datetime),
        }
    }
}

/// Operator request for a subscription activation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationCodeRequest {
    pub account_id: String,
    pub level: SubscriptionLevel,
    /// Overrides the level's default period
    #[serde(default)]
    pub duration_days: Option<u32>,
    /// Never-expiring subscription
    #[serde(default)]
    pub lifetime: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCodeResponse {
    pub code: String,
    pub purpose: CodePurpose,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&VerificationCode> for IssueCodeResponse {
    fn from(code: &VerificationCode) -> Self {
        Self {
            code: code.value.to_string(),
            purpose: code.purpose,
            expires_at: to_datetime(code.expires_at),
        }
    }
}

/// Bot-side redemption of a linking code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemLinkRequest {
    pub code: String,
    pub external_identity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStatusResponse {
    pub linked: bool,
    pub account_id: Option<AccountId>,
}
