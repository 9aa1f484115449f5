//! Request and domain counters, exposed on `/metrics`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// API Gateway metrics
#[derive(Default)]
pub struct GatewayMetrics {
    // Request counters
    pub requests_total: AtomicU64,
    pub requests_success: AtomicU64,
    pub requests_error: AtomicU64,

    pub rate_limit_rejected: AtomicU64,
    pub request_timeouts: AtomicU64,

    // Domain counters
    pub subscriptions_added: AtomicU64,
    pub notifications_delivered: AtomicU64,
    pub notifications_failed: AtomicU64,
    pub analyses_completed: AtomicU64,
    pub attestations_created: AtomicU64,

    // Latency tracking (sum and count)
    pub total_latency_ms: AtomicU64,
    pub request_count_for_latency: AtomicU64,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished request
    pub fn record_request(&self, success: bool, latency_ms: u64) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);

        if success {
            self.requests_success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.requests_error.fetch_add(1, Ordering::Relaxed);
        }

        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
        self.request_count_for_latency
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rate_limit_rejection(&self) {
        self.rate_limit_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timeout(&self) {
        self.request_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a subscribe call; only new members count.
    pub fn record_subscription(&self, added: bool) {
        if added {
            self.subscriptions_added.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_dispatch(&self, delivered: usize, failed: usize) {
        self.notifications_delivered
            .fetch_add(delivered as u64, Ordering::Relaxed);
        self.notifications_failed
            .fetch_add(failed as u64, Ordering::Relaxed);
    }

    pub fn record_analysis(&self) {
        self.analyses_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_attestation(&self) {
        self.attestations_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Get average latency in ms
    pub fn average_latency_ms(&self) -> f64 {
        let total = self.total_latency_ms.load(Ordering::Relaxed);
        let count = self.request_count_for_latency.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Export metrics as JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "requests": {
                "total": self.requests_total.load(Ordering::Relaxed),
                "success": self.requests_success.load(Ordering::Relaxed),
                "error": self.requests_error.load(Ordering::Relaxed),
                "rate_limited": self.rate_limit_rejected.load(Ordering::Relaxed),
                "timeouts": self.request_timeouts.load(Ordering::Relaxed),
            },
            "subscriptions": {
                "added": self.subscriptions_added.load(Ordering::Relaxed),
            },
            "notifications": {
                "delivered": self.notifications_delivered.load(Ordering::Relaxed),
                "failed": self.notifications_failed.load(Ordering::Relaxed),
            },
            "analyses": {
                "completed": self.analyses_completed.load(Ordering::Relaxed),
            },
            "attestations": {
                "created": self.attestations_created.load(Ordering::Relaxed),
            },
            "latency": {
                "average_ms": self.average_latency_ms(),
            }
        })
    }
}

/// Request timing helper
pub struct RequestTimer {
    start: Instant,
    metrics: Arc<GatewayMetrics>,
}

impl RequestTimer {
    pub fn new(metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Record the request and return its latency in ms.
    pub fn finish(self, success: bool) -> u64 {
        let latency_ms = self.start.elapsed().as_millis() as u64;
        self.metrics.record_request(success, latency_ms);
        latency_ms
    }
}
