//! Route handlers.
//!
//! Handlers translate between JSON bodies and [`EntitlementApi`] calls. They
//! hold no state of their own beyond the shared [`AppState`].

use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::Json;
use ea_01_code_registry::IssueRequest;
use ea_03_entitlement::{EntitlementApi, LinkResult};
use ea_telemetry::{log_account_event, log_event};
use shared_types::{AccountId, ExternalIdentity, Plan, DAY_MS};
use std::sync::Arc;

use crate::domain::error::{public_message, ApiError};
use crate::domain::types::{
    ActivateRequest, ActivationCodeRequest, ActivationResponse, ApiResponse, IssueCodeResponse,
    LinkStatusResponse, RedeemLinkRequest, StatusResponse,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn EntitlementApi>,
    pub account_header: HeaderName,
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// `GET /api/desktop/check/:code`
///
/// Answers 200 for every steady-state outcome, including unknown and
/// malformed codes, so the desktop client can render the message directly.
pub async fn check_status(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<StatusResponse> {
    match state.api.check_status(&code) {
        Ok(snapshot) => Ok(Json(ApiResponse::ok(StatusResponse::from_snapshot(
            &snapshot,
        )))),
        Err(err) if err.is_steady_state() => {
            let message = public_message(&err);
            Ok(Json(ApiResponse::failure(
                StatusResponse::error(message.clone()),
                message,
            )))
        }
        Err(err) => Err(err.into()),
    }
}

/// `POST /api/desktop/activate`
pub async fn activate(
    State(state): State<AppState>,
    Json(request): Json<ActivateRequest>,
) -> ApiResult<ActivationResponse> {
    let result = state.api.activate(&request.activation_code)?;
    log_account_event!(
        info,
        "gateway",
        "Subscription activated",
        result.account_id,
        level = ?result.snapshot.level
    );
    Ok(Json(ApiResponse::ok_with_message(
        ActivationResponse::from(&result),
        "Subscription activated",
    )))
}

/// `POST /api/codes`
///
/// Issues an account linking code for the caller. The account comes from the
/// header set by the auth proxy; any request body is ignored.
pub async fn issue_code(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<IssueCodeResponse> {
    let account_id = account_from_headers(&headers, &state.account_header)?;
    let code = state.api.issue_code(IssueRequest::linking(account_id))?;
    log_account_event!(
        debug,
        "gateway",
        "Code issued",
        code.account_id,
        purpose = code.purpose.as_str()
    );
    Ok(Json(ApiResponse::ok(IssueCodeResponse::from(&code))))
}

/// `POST /api/admin/activation-codes`, operator only.
pub async fn issue_activation_code(
    State(state): State<AppState>,
    Json(request): Json<ActivationCodeRequest>,
) -> ApiResult<IssueCodeResponse> {
    let account_id = request.account_id.trim();
    if account_id.is_empty() {
        return Err(ApiError::BadRequest("accountId is empty".into()));
    }
    let plan = activation_plan(&request)?;

    let code = state
        .api
        .issue_code(IssueRequest::activation(AccountId::new(account_id), plan))?;
    log_account_event!(
        info,
        "gateway",
        "Activation code issued",
        code.account_id,
        level = %plan.level
    );
    Ok(Json(ApiResponse::ok(IssueCodeResponse::from(&code))))
}

/// `POST /api/link/redeem`, called by the chat bot.
pub async fn redeem_link(
    State(state): State<AppState>,
    Json(request): Json<RedeemLinkRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LinkStatusResponse>>), ApiError> {
    let identity = parse_identity(&request.external_identity)?;
    let outcome = state.api.redeem_for_linking(&request.code, &identity)?;

    let response = match outcome {
        LinkResult::Linked { linkage } => (
            StatusCode::OK,
            Json(ApiResponse::ok_with_message(
                LinkStatusResponse {
                    linked: true,
                    account_id: Some(linkage.account_id),
                },
                "Account linked",
            )),
        ),
        LinkResult::AlreadyLinked { .. } => {
            log_event!(info, "gateway", "Link rejected", identity = %identity, outcome = "already_linked");
            (
                StatusCode::CONFLICT,
                Json(ApiResponse::failure(
                    unlinked(),
                    "This identity is already linked to an account",
                )),
            )
        }
        LinkResult::AccountAlreadyLinked { .. } => {
            log_event!(info, "gateway", "Link rejected", identity = %identity, outcome = "account_already_linked");
            (
                StatusCode::CONFLICT,
                Json(ApiResponse::failure(
                    unlinked(),
                    "This account is already linked to another identity",
                )),
            )
        }
    };
    Ok(response)
}

/// `GET /api/link/status/:identity`
pub async fn link_status(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> ApiResult<LinkStatusResponse> {
    let identity = parse_identity(&identity)?;
    let account_id = state.api.linked_account(&identity);
    Ok(Json(ApiResponse::ok(LinkStatusResponse {
        linked: account_id.is_some(),
        account_id,
    })))
}

/// `GET /api/bot/subscription/:identity`
pub async fn identity_subscription(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> ApiResult<StatusResponse> {
    let identity = parse_identity(&identity)?;
    let snapshot = state.api.status_for_identity(&identity)?;
    Ok(Json(ApiResponse::ok(StatusResponse::from_snapshot(
        &snapshot,
    ))))
}

/// `POST /api/admin/accounts/:account_id/revoke`, operator only.
pub async fn revoke(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> ApiResult<StatusResponse> {
    let account_id = AccountId::new(account_id);
    let snapshot = state.api.revoke(&account_id)?;
    log_account_event!(warn, "gateway", "Subscription revoked", account_id);
    Ok(Json(ApiResponse::ok(StatusResponse::from_snapshot(
        &snapshot,
    ))))
}

fn unlinked() -> LinkStatusResponse {
    LinkStatusResponse {
        linked: false,
        account_id: None,
    }
}

fn account_from_headers(headers: &HeaderMap, name: &HeaderName) -> Result<AccountId, ApiError> {
    let value = headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingAccount)?;
    Ok(AccountId::new(value))
}

fn parse_identity(raw: &str) -> Result<ExternalIdentity, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest("externalIdentity is empty".into()));
    }
    Ok(ExternalIdentity::new(trimmed))
}

fn activation_plan(request: &ActivationCodeRequest) -> Result<Plan, ApiError> {
    if request.lifetime {
        return Ok(Plan::lifetime(request.level));
    }
    match request.duration_days {
        Some(0) => Err(ApiError::BadRequest("durationDays must be positive".into())),
        Some(days) => Ok(Plan::with_duration(request.level, u64::from(days) * DAY_MS)),
        None => Ok(Plan::for_level(request.level)),
    }
}
