//! # API Gateway
//!
//! HTTP surface of the entitlement authority. Three kinds of callers share
//! one router:
//!
//! - the desktop client polls status and redeems activation codes,
//! - the web form generates linking codes for the signed-in account,
//! - the chat bot redeems linking codes and looks up linked subscriptions.
//!
//! Operators mint activation codes and revoke subscriptions through the
//! admin routes, which exist only when an operator token is configured.
//!
//! ## Routes
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/health` | liveness |
//! | GET | `/api/desktop/check/:code` | status by activation code |
//! | POST | `/api/desktop/activate` | redeem an activation code |
//! | POST | `/api/codes` | issue a linking code for the caller's account |
//! | POST | `/api/link/redeem` | redeem a linking code |
//! | GET | `/api/link/status/:identity` | linked account of an identity |
//! | GET | `/api/bot/subscription/:identity` | subscription of a linked identity |
//! | POST | `/api/admin/activation-codes` | mint an activation code (operator) |
//! | POST | `/api/admin/accounts/:account_id/revoke` | manual revocation (operator) |
//!
//! ## Status Codes
//!
//! | Outcome | Status |
//! |---------|--------|
//! | malformed code / plan | 400 |
//! | missing caller header or operator token | 401 |
//! | wrong operator token | 403 |
//! | unknown code, account or identity | 404 |
//! | code already redeemed, link conflict | 409 |
//! | code expired | 410 |
//! | wrong code purpose | 422 |
//! | storage unavailable | 503 |
//!
//! The status check is the exception: every steady-state outcome is a 200
//! with `isActive: false` and an `errorMessage`.
//!
//! The caller's account for `/api/codes` is read from a header
//! (`x-account-id` by default) set by the auth proxy in front of the
//! gateway. Admin routes check `x-operator-token` instead.

pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod service;

pub use domain::*;
pub use handlers::AppState;
pub use service::ApiGatewayService;
