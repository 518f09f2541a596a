//! Gateway errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ea_01_code_registry::IssuanceError;
use ea_03_entitlement::EntitlementError;
use shared_types::StoreError;
use thiserror::Error;
use tracing::error;

use super::types::ApiResponse;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("Invalid header name: {0:?}")]
    InvalidHeader(String),

    #[error("Operator token must not be empty")]
    EmptyOperatorToken,
}

/// Server lifecycle errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

/// Errors returned by request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Entitlement(#[from] EntitlementError),

    #[error("Missing caller identity header")]
    MissingAccount,

    #[error("Missing operator token")]
    MissingOperatorToken,

    #[error("Operator token rejected")]
    OperatorTokenRejected,

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingAccount | Self::MissingOperatorToken => StatusCode::UNAUTHORIZED,
            Self::OperatorTokenRejected => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Entitlement(err) => entitlement_status(err),
        }
    }
}

pub(crate) fn entitlement_status(err: &EntitlementError) -> StatusCode {
    match err {
        EntitlementError::InvalidCode(_) => StatusCode::BAD_REQUEST,
        EntitlementError::CodeNotFound
        | EntitlementError::AccountNotFound { .. }
        | EntitlementError::IdentityNotLinked { .. } => StatusCode::NOT_FOUND,
        EntitlementError::CodeExpired { .. } => StatusCode::GONE,
        EntitlementError::CodeAlreadyRedeemed => StatusCode::CONFLICT,
        EntitlementError::WrongPurpose { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        EntitlementError::Issuance(IssuanceError::MissingPlan | IssuanceError::PlanNotAllowed) => {
            StatusCode::BAD_REQUEST
        }
        EntitlementError::Issuance(IssuanceError::Storage(_))
        | EntitlementError::Issuance(IssuanceError::CollisionsExhausted { .. })
        | EntitlementError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        EntitlementError::Issuance(IssuanceError::Generator(_))
        | EntitlementError::PlanMissing
        | EntitlementError::ClaimLost => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Message shown to the caller. Storage details stay in the logs.
pub(crate) fn public_message(err: &EntitlementError) -> String {
    match err {
        EntitlementError::Storage(StoreError::CapacityExceeded { .. })
        | EntitlementError::Storage(StoreError::Unavailable(_))
        | EntitlementError::Storage(StoreError::DuplicateCode)
        | EntitlementError::Issuance(IssuanceError::Storage(_)) => {
            "Service temporarily unavailable".to_string()
        }
        EntitlementError::CodeNotFound => "Invalid code".to_string(),
        EntitlementError::CodeExpired { .. } => "Code has expired".to_string(),
        other => other.to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Self::Entitlement(err) => {
                if !err.is_steady_state() {
                    error!(error = %err, "Request failed");
                }
                public_message(err)
            }
            other => other.to_string(),
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}
