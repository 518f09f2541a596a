//! Operator authentication for the admin routes.
//!
//! Minting activation codes and revoking subscriptions change what an
//! account is entitled to, so they sit behind a shared operator token
//! instead of the caller-identity header the web form uses.

use axum::extract::{Request, State};
use axum::http::HeaderName;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::domain::error::ApiError;

/// Expected operator token and the header it arrives in.
#[derive(Clone)]
pub struct OperatorAuth {
    header: HeaderName,
    token: Arc<str>,
}

impl OperatorAuth {
    pub fn new(header: HeaderName, token: impl Into<Arc<str>>) -> Self {
        Self {
            header,
            token: token.into(),
        }
    }

    fn check(&self, presented: Option<&str>) -> Result<(), ApiError> {
        let presented = presented.ok_or(ApiError::MissingOperatorToken)?;
        if constant_time_compare(presented, &self.token) {
            Ok(())
        } else {
            Err(ApiError::OperatorTokenRejected)
        }
    }
}

impl std::fmt::Debug for OperatorAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorAuth")
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

/// Rejects the request unless it carries the operator token.
pub async fn require_operator(
    State(auth): State<OperatorAuth>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(&auth.header)
        .and_then(|v| v.to_str().ok());

    if let Err(err) = auth.check(presented) {
        warn!(path = %request.uri().path(), error = %err, "Operator route access denied");
        return Err(err);
    }
    Ok(next.run(request).await)
}

/// Length and content are compared without early exit.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let max_len = a.len().max(b.len());
    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];
    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    (lengths_equal & a_padded.ct_eq(&b_padded)).into()
}
