//! API Gateway service - routing and server lifecycle.

use crate::context::GatewayContext;
use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::handlers::{
    analysis, attestation, method_not_allowed, not_found, notify, subscriptions, system,
};
use crate::middleware::{
    cleanup_task, create_cors_layer, GatewayMetrics, RateLimitLayer, TimeoutLayer, TracingLayer,
};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tracing::info;

const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// HTTP front end of the node.
pub struct ApiGatewayService {
    config: GatewayConfig,
    context: Arc<GatewayContext>,
    rate_limit: RateLimitLayer,
}

impl ApiGatewayService {
    /// Validate the configuration and bind the handlers to `context`.
    pub fn new(config: GatewayConfig, context: GatewayContext) -> Result<Self, GatewayError> {
        config.validate()?;

        let context = Arc::new(context.with_service_name(config.service_name.clone()));
        let rate_limit = RateLimitLayer::new(config.rate_limit.clone(), context.metrics());

        Ok(Self {
            config,
            context,
            rate_limit,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn context(&self) -> Arc<GatewayContext> {
        Arc::clone(&self.context)
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        self.context.metrics()
    }

    /// Build the HTTP router.
    pub fn router(&self) -> Router {
        let metrics = self.context.metrics();

        let bounded = Router::new()
            .route(
                "/subscribe",
                post(subscriptions::subscribe).fallback(method_not_allowed("POST")),
            )
            .route(
                "/userSubscriptions",
                get(subscriptions::user_subscriptions).fallback(method_not_allowed("GET")),
            )
            .route(
                "/getSubscriptions",
                get(subscriptions::get_subscriptions).fallback(method_not_allowed("GET")),
            )
            .route(
                "/consentMessage",
                get(subscriptions::consent_message).fallback(method_not_allowed("GET")),
            )
            .route(
                "/createAttestation",
                post(attestation::create_attestation).fallback(method_not_allowed("POST")),
            )
            .route(
                "/health",
                get(system::health).fallback(method_not_allowed("GET")),
            )
            .route(
                "/metrics",
                get(system::metrics).fallback(method_not_allowed("GET")),
            )
            .layer(TimeoutLayer::new(
                self.config.timeouts.request,
                Arc::clone(&metrics),
            ));

        // Paced dispatch and oracle polling carry their own bounds
        let unbounded = Router::new()
            .route(
                "/notify",
                post(notify::notify).fallback(method_not_allowed("POST")),
            )
            .route(
                "/gpt4vision",
                post(analysis::analyze_image).fallback(method_not_allowed("POST")),
            );

        let middleware = ServiceBuilder::new()
            .layer(create_cors_layer(&self.config.cors))
            .layer(TracingLayer::new(Arc::clone(&metrics)))
            .layer(self.rate_limit.clone());

        bounded
            .merge(unbounded)
            .fallback(not_found)
            .layer(DefaultBodyLimit::max(self.config.limits.max_request_size))
            .layer(middleware)
            .with_state(Arc::clone(&self.context))
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayError::Bind { addr, source })?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            info!(addr = %addr, "Starting HTTP server");
        }

        let cleanup = tokio::spawn(cleanup_task(
            self.rate_limit.state(),
            RATE_LIMIT_CLEANUP_INTERVAL,
            self.config.rate_limit.bucket_idle,
        ));

        let app = self
            .router()
            .into_make_service_with_connect_info::<SocketAddr>();
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(GatewayError::Server);

        cleanup.abort();
        info!("API Gateway stopped");
        result
    }
}
