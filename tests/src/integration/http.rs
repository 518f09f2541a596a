//! # Gateway Over a Wired Container
//!
//! Drives the HTTP router built on the node's `ServiceContainer`, so the
//! production wiring (CSPRNG codes, in-memory adapters) is what answers.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use ea_04_api_gateway::ApiGatewayService;
    use node_runtime::{NodeConfig, ServiceContainer};
    use serde_json::{json, Value};
    use shared_types::{MockTimeSource, DAY_MS, MINUTE_MS};
    use tower::ServiceExt;

    const T0: u64 = 1_700_000_000_000;

    const OPERATOR_TOKEN: &str = "integration-operator";

    fn wired() -> (Router, Arc<MockTimeSource>) {
        let clock = Arc::new(MockTimeSource::new(T0));
        let mut config = NodeConfig::default();
        config.gateway.operator_token = Some(OPERATOR_TOKEN.into());
        let container = ServiceContainer::with_time_source(config, clock.clone());
        let gateway =
            ApiGatewayService::new(container.config.gateway.clone(), container.api()).unwrap();
        (gateway.router(), clock)
    }

    async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn post(uri: &str, account: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .header("x-account-id", account)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn mint(account: &str, level: &str) -> Request<Body> {
        Request::post("/api/admin/activation-codes")
            .header("content-type", "application/json")
            .header("x-operator-token", OPERATOR_TOKEN)
            .body(Body::from(
                json!({"accountId": account, "level": level}).to_string(),
            ))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_desktop_activation_lifecycle() {
        let (router, clock) = wired();

        let (status, body) = call(&router, mint("buyer", "STANDARD")).await;
        assert_eq!(status, StatusCode::OK);
        let code = body["data"]["code"].as_str().unwrap().to_string();
        assert_eq!(code.len(), 12);

        let check = format!("/api/desktop/check/{code}");
        let (_, body) = call(&router, get(&check)).await;
        assert_eq!(body["data"]["isActive"], false);
        assert_eq!(body["data"]["reason"], "NOT_ACTIVATED");

        clock.advance(MINUTE_MS);
        let (status, body) = call(
            &router,
            post("/api/desktop/activate", "", json!({"activationCode": code})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["accountId"], "buyer");
        assert_eq!(body["data"]["expirationDate"], "2023-12-14T22:13:20Z");

        let (_, body) = call(&router, get(&check)).await;
        assert_eq!(body["data"]["isActive"], true);
        assert_eq!(body["data"]["level"], "STANDARD");

        clock.set(T0 + 31 * DAY_MS);
        let (status, body) = call(&router, get(&check)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["isActive"], false);
        assert_eq!(body["data"]["reason"], "EXPIRED");
        assert_eq!(body["data"]["errorMessage"], "Subscription has expired");
    }

    #[tokio::test]
    async fn test_expired_activation_code_is_gone() {
        let (router, clock) = wired();
        let (_, body) = call(&router, mint("buyer", "BASIC")).await;
        let code = body["data"]["code"].as_str().unwrap().to_string();

        clock.advance(2 * DAY_MS);
        let (status, body) = call(
            &router,
            post("/api/desktop/activate", "", json!({"activationCode": code})),
        )
        .await;
        assert_eq!(status, StatusCode::GONE);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_bot_linking_lifecycle() {
        let (router, _) = wired();

        let (_, body) = call(
            &router,
            post("/api/codes", "acct-1", json!({})),
        )
        .await;
        let code = body["data"]["code"].as_str().unwrap().to_string();

        let (status, body) = call(
            &router,
            post(
                "/api/link/redeem",
                "",
                json!({"code": code, "externalIdentity": "discordUser#1234"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["accountId"], "acct-1");

        // Replay of the same code.
        let (status, _) = call(
            &router,
            post(
                "/api/link/redeem",
                "",
                json!({"code": code, "externalIdentity": "someoneElse#1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, body) = call(&router, get("/api/link/status/someoneElse%231")).await;
        assert_eq!(body["data"]["linked"], false);
    }

    #[tokio::test]
    async fn test_malformed_code_rejected() {
        let (router, _) = wired();
        let (status, body) = call(
            &router,
            post("/api/desktop/activate", "", json!({"activationCode": "no!"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}
