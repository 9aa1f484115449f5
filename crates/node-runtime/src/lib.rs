//! # Node Runtime Library
//!
//! This library exposes the node runtime for the `real-you-node` binary and
//! for tests.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Validate that a default sender key is present
//! 3. Initialize subsystems in dependency order
//! 4. Run the requested command (`serve` or `broadcast`)

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod container;

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, warn};

use ry_03_notification_dispatch::{DispatchReport, RetryPolicy};
use ry_06_api_gateway::ApiGatewayService;

pub use container::{NodeConfig, SubsystemContainer};

/// Wait before the single retry of a failed broadcast delivery.
pub const DEFAULT_BROADCAST_RETRY_DELAY: Duration = Duration::from_secs(60);

/// The node runtime: an initialized container plus the commands it can run.
pub struct NodeRuntime {
    container: SubsystemContainer,
}

impl NodeRuntime {
    /// Create a node runtime, initializing every configured subsystem.
    pub fn new(config: NodeConfig) -> Result<Self> {
        info!("Creating Real You node runtime");
        let container = SubsystemContainer::new(config)?;
        Ok(Self { container })
    }

    /// Serve the HTTP gateway until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let service = self.gateway()?;
        info!("===========================================");
        info!("  Real You Node v{}", ry_06_api_gateway::VERSION);
        info!("  HTTP: {}", service.config().http_addr());
        info!("===========================================");

        service
            .run(shutdown)
            .await
            .context("API gateway terminated with an error")
    }

    /// Serve on an already bound listener. Used by tests.
    pub async fn serve_on<F>(self, listener: tokio::net::TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.gateway()?
            .serve(listener, shutdown)
            .await
            .context("API gateway terminated with an error")
    }

    /// Notify every subscriber of `label` once, retrying each failed delivery
    /// a single time after `retry_delay`.
    pub async fn broadcast(&self, label: &str, retry_delay: Duration) -> Result<DispatchReport> {
        let dispatcher = self
            .container
            .dispatcher
            .as_ref()
            .context("RY_RELAY_URL must be set to broadcast")?;

        let started = Instant::now();
        let report = dispatcher
            .dispatch_with_retry(label, RetryPolicy::OnceAfter(retry_delay))
            .await
            .with_context(|| format!("Broadcast for tag {} failed", label))?;

        let total_ms = started.elapsed().as_millis() as u64;
        let errors = report.error_count();
        if report.failed_count() > 0 {
            warn!(
                tag = %label,
                failed = report.failed_count(),
                "Some subscribers were not reached"
            );
        }
        info!(
            tag = %label,
            delivered = report.delivered_count(),
            total_ms,
            errors,
            "Total time: {}ms with {} errors",
            total_ms,
            errors
        );
        Ok(report)
    }

    /// Get a reference to the subsystem container.
    pub fn container(&self) -> &SubsystemContainer {
        &self.container
    }

    fn gateway(&self) -> Result<ApiGatewayService> {
        ApiGatewayService::new(
            self.container.config.gateway.clone(),
            self.container.gateway_context(),
        )
        .context("Failed to create API gateway")
    }
}
