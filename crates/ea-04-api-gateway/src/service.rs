//! API Gateway service: router construction and the HTTP server loop.

use axum::http::HeaderName;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use ea_03_entitlement::EntitlementApi;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::domain::config::GatewayConfig;
use crate::domain::error::{ConfigError, GatewayError};
use crate::handlers::{self, AppState};
use crate::middleware::{require_operator, OperatorAuth};

/// API Gateway service state
pub struct ApiGatewayService {
    config: GatewayConfig,
    state: AppState,
    operator: Option<OperatorAuth>,
}

impl ApiGatewayService {
    /// Create a new API Gateway service
    pub fn new(config: GatewayConfig, api: Arc<dyn EntitlementApi>) -> Result<Self, GatewayError> {
        config.validate()?;

        let account_header = header_name(&config.account_header)?;
        let operator = match config.operator_token.as_deref() {
            Some(token) => Some(OperatorAuth::new(
                header_name(&config.operator_header)?,
                token,
            )),
            None => {
                info!("No operator token configured, admin routes disabled");
                None
            }
        };

        Ok(Self {
            config,
            state: AppState {
                api,
                account_header,
            },
            operator,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Build the HTTP router with its middleware stack
    pub fn router(&self) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(self.config.request_timeout()));

        let mut router: Router<AppState> = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/api/desktop/check/:code", get(handlers::check_status))
            .route("/api/desktop/activate", post(handlers::activate))
            .route("/api/codes", post(handlers::issue_code))
            .route("/api/link/redeem", post(handlers::redeem_link))
            .route("/api/link/status/:identity", get(handlers::link_status))
            .route(
                "/api/bot/subscription/:identity",
                get(handlers::identity_subscription),
            );

        if let Some(operator) = &self.operator {
            let admin = Router::new()
                .route(
                    "/api/admin/activation-codes",
                    post(handlers::issue_activation_code),
                )
                .route(
                    "/api/admin/accounts/:account_id/revoke",
                    post(handlers::revoke),
                )
                .route_layer(from_fn_with_state(operator.clone(), require_operator));
            router = router.merge(admin);
        }

        let router = router.layer(middleware).with_state(self.state.clone());

        if self.config.cors_permissive {
            router.layer(CorsLayer::permissive())
        } else {
            router
        }
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayError::Bind { addr, source })?;
        self.serve_on(listener, shutdown).await
    }

    /// Serve on an already bound listener.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local: Option<SocketAddr> = listener.local_addr().ok();
        info!(addr = ?local, "Starting HTTP server");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(GatewayError::Serve)?;

        info!("HTTP server stopped");
        Ok(())
    }
}

fn header_name(name: &str) -> Result<HeaderName, ConfigError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|_| ConfigError::InvalidHeader(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use ea_01_code_registry::{CodeRegistryConfig, SequenceCodeGenerator};
    use ea_03_entitlement::{EntitlementConfig, EntitlementService};
    use serde_json::{json, Value};
    use shared_types::{MockTimeSource, MINUTE_MS};
    use tower::ServiceExt;

    const T0: u64 = 1_700_000_000_000;

    const OPERATOR_TOKEN: &str = "op-token";

    fn setup() -> (Router, Arc<MockTimeSource>) {
        setup_with(GatewayConfig {
            operator_token: Some(OPERATOR_TOKEN.into()),
            ..GatewayConfig::default()
        })
    }

    fn setup_with(config: GatewayConfig) -> (Router, Arc<MockTimeSource>) {
        let clock = Arc::new(MockTimeSource::new(T0));
        let generator = Arc::new(SequenceCodeGenerator::new(["ABC123", "LINK42"]));
        let service = EntitlementService::in_memory(
            EntitlementConfig::default(),
            CodeRegistryConfig::for_testing(),
            generator,
            clock.clone(),
        );
        let gateway = ApiGatewayService::new(config, Arc::new(service)).unwrap();
        (gateway.router(), clock)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .header("x-account-id", "acc-1")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn admin_post(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .header("x-operator-token", OPERATOR_TOKEN)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = setup();
        let response = router.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_activation_over_http() {
        let (router, clock) = setup();

        let (status, body) = send(
            &router,
            admin_post(
                "/api/admin/activation-codes",
                json!({"accountId": "acc-1", "level": "STANDARD"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["code"], "ABC123");

        let (status, body) = send(&router, get("/api/desktop/check/ABC123")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["isActive"], false);
        assert_eq!(body["data"]["reason"], "NOT_ACTIVATED");

        clock.advance(MINUTE_MS);
        let (status, body) = send(
            &router,
            post_json("/api/desktop/activate", json!({"activationCode": "abc123"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["isActive"], true);
        assert_eq!(body["data"]["level"], "STANDARD");

        let (status, body) = send(
            &router,
            post_json("/api/desktop/activate", json!({"activationCode": "ABC123"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_check_unknown_code_is_ok() {
        let (router, _) = setup();
        let (status, body) = send(&router, get("/api/desktop/check/NOPE99")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["data"]["isActive"], false);
        assert_eq!(body["data"]["errorMessage"], "Invalid code");
    }

    #[tokio::test]
    async fn test_issue_requires_account_header() {
        let (router, _) = setup();
        let request = Request::post("/api/codes")
            .header("content-type", "application/json")
            .body(Body::from(json!({"purpose": "ACCOUNT_LINKING"}).to_string()))
            .unwrap();
        let (status, _) = send(&router, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_activation_code_needs_level() {
        let (router, _) = setup();
        let (status, _) = send(
            &router,
            admin_post("/api/admin/activation-codes", json!({"accountId": "acc-1"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(
            &router,
            admin_post(
                "/api/admin/activation-codes",
                json!({"accountId": "  ", "level": "BASIC"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_public_issue_only_mints_linking_codes() {
        let (router, _) = setup();

        let (status, body) = send(
            &router,
            post_json(
                "/api/codes",
                json!({"purpose": "SUBSCRIPTION_ACTIVATION", "level": "PREMIUM", "lifetime": true}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["purpose"], "ACCOUNT_LINKING");

        let (status, _) = send(
            &router,
            post_json("/api/desktop/activate", json!({"activationCode": "ABC123"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, body) = send(&router, get("/api/desktop/check/ABC123")).await;
        assert_eq!(body["data"]["isActive"], false);
    }

    #[tokio::test]
    async fn test_admin_routes_require_operator_token() {
        let (router, _) = setup();
        let body = json!({"accountId": "acc-1", "level": "PREMIUM", "lifetime": true});

        let (status, _) = send(&router, post_json("/api/admin/activation-codes", body.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let wrong = Request::post("/api/admin/activation-codes")
            .header("content-type", "application/json")
            .header("x-operator-token", "guess")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, _) = send(&router, wrong).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&router, post_json("/api/admin/accounts/victim/revoke", json!({}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        // Nothing was minted: the first generated value is still free.
        let (_, body) = send(&router, get("/api/desktop/check/ABC123")).await;
        assert_eq!(body["data"]["errorMessage"], "Invalid code");
    }

    #[tokio::test]
    async fn test_admin_routes_absent_without_token() {
        let (router, _) = setup_with(GatewayConfig::default());

        let (status, _) = send(
            &router,
            admin_post(
                "/api/admin/activation-codes",
                json!({"accountId": "acc-1", "level": "BASIC"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&router, admin_post("/api/admin/accounts/acc-1/revoke", json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_link_flow_over_http() {
        let (router, _) = setup();

        // First generated value goes to this linking code.
        let (_, body) = send(
            &router,
            post_json("/api/codes", json!({})),
        )
        .await;
        let code = body["data"]["code"].as_str().unwrap().to_string();

        let (status, body) = send(
            &router,
            post_json(
                "/api/link/redeem",
                json!({"code": code, "externalIdentity": "discordUser#1234"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["linked"], true);
        assert_eq!(body["data"]["accountId"], "acc-1");

        let (status, body) = send(&router, get("/api/link/status/discordUser%231234")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["accountId"], "acc-1");

        let (status, body) = send(&router, get("/api/bot/subscription/discordUser%231234")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["reason"], "NOT_ACTIVATED");

        let (status, _) = send(&router, get("/api/bot/subscription/stranger")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_link_conflict_is_409() {
        let (router, _) = setup();

        for _ in 0..2 {
            send(&router, post_json("/api/codes", json!({}))).await;
        }
        let (status, _) = send(
            &router,
            post_json(
                "/api/link/redeem",
                json!({"code": "ABC123", "externalIdentity": "user#1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // Same account, different identity.
        let (status, body) = send(
            &router,
            post_json(
                "/api/link/redeem",
                json!({"code": "LINK42", "externalIdentity": "user#2"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["data"]["linked"], false);
    }

    #[tokio::test]
    async fn test_revoke_endpoint() {
        let (router, _) = setup();
        send(
            &router,
            admin_post(
                "/api/admin/activation-codes",
                json!({"accountId": "acc-1", "level": "PREMIUM"}),
            ),
        )
        .await;
        send(
            &router,
            post_json("/api/desktop/activate", json!({"activationCode": "ABC123"})),
        )
        .await;

        let (status, body) = send(
            &router,
            admin_post("/api/admin/accounts/acc-1/revoke", json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["reason"], "REVOKED");

        let (_, body) = send(&router, get("/api/desktop/check/ABC123")).await;
        assert_eq!(body["data"]["isActive"], false);
        assert_eq!(body["data"]["reason"], "REVOKED");
    }

    #[tokio::test]
    async fn test_serve_shuts_down() {
        let clock = Arc::new(MockTimeSource::new(T0));
        let service = EntitlementService::in_memory(
            EntitlementConfig::default(),
            CodeRegistryConfig::for_testing(),
            Arc::new(SequenceCodeGenerator::new(Vec::<&str>::new())),
            clock,
        );
        let gateway = ApiGatewayService::new(GatewayConfig::default(), Arc::new(service)).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(gateway.serve_on(listener, async move {
            let _ = rx.await;
        }));
        tx.send(()).unwrap();
        assert!(handle.await.unwrap().is_ok());
    }
}
