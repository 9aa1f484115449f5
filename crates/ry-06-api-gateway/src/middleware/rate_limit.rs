//! Per-client rate limiting.
//!
//! Each client IP gets its own governor bucket of `requests_per_second` with
//! `burst_size` headroom. Idle buckets are dropped by [`cleanup_task`].

use super::metrics::GatewayMetrics;
use crate::domain::config::RateLimitConfig;
use crate::domain::error::ApiError;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, HeaderValue, Request};
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tower::{Layer, Service};
use tracing::{debug, warn};

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

struct ClientBucket {
    limiter: DirectLimiter,
    touched: Instant,
}

fn quota(config: &RateLimitConfig) -> Quota {
    let rate = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
    let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);
    Quota::per_second(rate).allow_burst(burst)
}

/// Buckets for every client seen recently.
pub struct RateLimitState {
    buckets: DashMap<IpAddr, ClientBucket>,
    config: RateLimitConfig,
}

impl RateLimitState {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: DashMap::new(),
            config,
        }
    }

    /// Take one token for `ip`, or return how long until one is available.
    pub fn check(&self, ip: IpAddr) -> Result<(), Duration> {
        if !self.config.enabled || self.config.whitelist.contains(&ip) {
            return Ok(());
        }

        let mut bucket = self.buckets.entry(ip).or_insert_with(|| {
            debug!(ip = %ip, "New client bucket");
            ClientBucket {
                limiter: RateLimiter::direct(quota(&self.config)),
                touched: Instant::now(),
            }
        });
        bucket.touched = Instant::now();
        bucket
            .limiter
            .check()
            .map_err(|denied| denied.wait_time_from(DefaultClock::default().now()))
    }

    /// Drop buckets untouched for longer than `max_idle`.
    pub fn cleanup(&self, max_idle: Duration) {
        let before = self.buckets.len();
        self.buckets
            .retain(|_, bucket| bucket.touched.elapsed() <= max_idle);
        let dropped = before.saturating_sub(self.buckets.len());
        if dropped > 0 {
            debug!(dropped, "Dropped idle client buckets");
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}

#[derive(Clone)]
pub struct RateLimitLayer {
    state: Arc<RateLimitState>,
    metrics: Arc<GatewayMetrics>,
}

impl RateLimitLayer {
    pub fn new(config: RateLimitConfig, metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            state: Arc::new(RateLimitState::new(config)),
            metrics,
        }
    }

    pub fn state(&self) -> Arc<RateLimitState> {
        Arc::clone(&self.state)
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            layer: self.clone(),
        }
    }
}

#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    layer: RateLimitLayer,
}

impl<S> Service<Request<Body>> for RateLimitService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let ip = client_ip(&req, self.layer.state.config().trust_proxy_headers);
        let verdict = self.layer.state.check(ip);
        let metrics = Arc::clone(&self.layer.metrics);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            match verdict {
                Ok(()) => inner.call(req).await,
                Err(wait) => {
                    warn!(ip = %ip, wait_ms = wait.as_millis() as u64, "Rate limited");
                    metrics.record_rate_limit_rejection();
                    Ok(too_many_requests(wait))
                }
            }
        })
    }
}

/// Client address: proxy headers first when trusted, then the socket peer.
fn client_ip<B>(req: &Request<B>, trust_proxy_headers: bool) -> IpAddr {
    let header_ip = |name: &str, pick_first: bool| {
        let value = req.headers().get(name)?.to_str().ok()?;
        let value = if pick_first {
            value.split(',').next()?
        } else {
            value
        };
        value.trim().parse::<IpAddr>().ok()
    };

    if trust_proxy_headers {
        if let Some(ip) = header_ip("x-forwarded-for", true).or_else(|| header_ip("x-real-ip", false)) {
            return ip;
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn too_many_requests(wait: Duration) -> Response {
    let seconds = wait.as_millis().div_ceil(1000) as u64;
    let mut response = ApiError::rate_limited().into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(seconds.max(1)));
    response
}

/// Periodically drop idle client buckets. Runs until aborted.
pub async fn cleanup_task(state: Arc<RateLimitState>, every: Duration, max_idle: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        state.cleanup(max_idle);
    }
}
