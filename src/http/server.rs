//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, CORS)
//! - Build the shared upstream client once
//! - Serve on a listener until shutdown is signalled

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::handlers::{proxy_get, root};
use crate::http::request::{make_request_span, MakeRequestUuidV4};
use crate::security::cors_layer;
use crate::upstream::{ClientInitError, MenuQuery, ParamMode, RestaurantListQuery, UpstreamClient};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
    pub param_mode: ParamMode,
}

impl AppState {
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ClientInitError> {
        Ok(Self {
            upstream: Arc::new(UpstreamClient::new(&config.upstream)?),
            param_mode: ParamMode::from_strict(config.security.strict_validation),
        })
    }
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ClientInitError> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(root))
            .route("/api/restaurants", get(proxy_get::<RestaurantListQuery>))
            .route("/api/menu", get(proxy_get::<MenuQuery>))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(cors_layer()),
            )
    }

    /// The fully layered router, for driving without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Bind the configured listener address.
    ///
    /// Only reachable once `new` has built the upstream client, so a bad
    /// client setup never holds the port.
    pub async fn bind(&self) -> Result<TcpListener, std::io::Error> {
        let listener = TcpListener::bind(self.config.listener.bind_address()).await?;
        tracing::info!(address = %listener.local_addr()?, "Listening for connections");
        Ok(listener)
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires. In-flight requests are allowed to finish.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            strict_validation = self.config.security.strict_validation,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handlers::ROOT_GREETING;
    use crate::http::request::X_REQUEST_ID;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use httpmock::prelude::*;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn server_with(config: ProxyConfig) -> HttpServer {
        HttpServer::new(config).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn root_returns_greeting() {
        let app = server_with(ProxyConfig::default()).router();

        let response = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body, json!({ "test": ROOT_GREETING }));
    }

    #[tokio::test]
    async fn responses_carry_generated_request_id() {
        let app = server_with(ProxyConfig::default()).router();

        let response = app.oneshot(get_request("/")).await.unwrap();
        let id = response.headers().get(X_REQUEST_ID).unwrap().to_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn caller_request_id_is_kept() {
        let app = server_with(ProxyConfig::default()).router();

        let request = Request::builder()
            .uri("/")
            .header(X_REQUEST_ID, "trace-me")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()[X_REQUEST_ID], "trace-me");
    }

    #[tokio::test]
    async fn any_origin_is_allowed() {
        let app = server_with(ProxyConfig::default()).router();

        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "http://localhost:1234")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn preflight_is_answered() {
        let app = server_with(ProxyConfig::default()).router();

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/menu")
            .header(header::ORIGIN, "http://localhost:1234")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(response.status().is_success());
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn bind_uses_configured_address() {
        let mut config = ProxyConfig::default();
        config.listener.host = "127.0.0.1".into();
        config.listener.port = 0;
        let server = server_with(config);

        let listener = server.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_ne!(addr.port(), 0);
    }

    #[test]
    fn bad_upstream_client_fails_before_any_bind() {
        let mut config = ProxyConfig::default();
        config.upstream.user_agent = "bad\nagent".into();
        assert!(matches!(
            HttpServer::new(config),
            Err(ClientInitError::InvalidUserAgent(_))
        ));
    }

    #[tokio::test]
    async fn repeated_keys_are_not_rejected() {
        let upstream = MockServer::start_async().await;
        let mock = upstream
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/restaurants/list/v5")
                    .query_param("lat", "1,2");
                then.status(200).json_body(json!({ "ok": true }));
            })
            .await;

        let mut config = ProxyConfig::default();
        config.upstream.base_url = upstream.base_url();
        let app = server_with(config).router();

        let response = app
            .oneshot(get_request("/api/restaurants?lat=1&lat=2&lng=3"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = server_with(ProxyConfig::default()).router();
        let response = app.oneshot(get_request("/api/cart")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn strict_mode_rejects_before_calling_upstream() {
        let upstream = MockServer::start_async().await;
        let mock = upstream
            .mock_async(|when, then| {
                when.method(GET).path("/restaurants/list/v5");
                then.status(200).json_body(json!({}));
            })
            .await;

        let mut config = ProxyConfig::default();
        config.upstream.base_url = upstream.base_url();
        config.security.strict_validation = true;
        let app = server_with(config).router();

        let response = app
            .oneshot(get_request("/api/restaurants?lat=999&lng=77.59"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("`lat`"));
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn strict_mode_forwards_encoded_values() {
        let upstream = MockServer::start_async().await;
        let mock = upstream
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/menu/pl")
                    .query_param("restaurantId", "12/34")
                    .query_param("lat", "12.97");
                then.status(200).json_body(json!({ "data": [] }));
            })
            .await;

        let mut config = ProxyConfig::default();
        config.upstream.base_url = upstream.base_url();
        config.security.strict_validation = true;
        let app = server_with(config).router();

        let response = app
            .oneshot(get_request(
                "/api/menu?lat=12.97&lng=77.59&restaurantId=12%2F34",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        mock.assert_async().await;
    }
}
