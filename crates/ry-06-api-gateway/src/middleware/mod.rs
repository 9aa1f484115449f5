//! Middleware stack for the API Gateway.
//!
//! Layer order: Request → Cors → Tracing → RateLimit → BodyLimit → Timeout → Handler
//!
//! The timeout layer wraps every route except `/notify` and `/gpt4vision`.

pub mod cors;
pub mod metrics;
pub mod rate_limit;
pub mod timeout;
pub mod tracing;

pub use cors::create_cors_layer;
pub use metrics::{GatewayMetrics, RequestTimer};
pub use rate_limit::{cleanup_task, RateLimitLayer, RateLimitState};
pub use timeout::TimeoutLayer;
pub use tracing::{TracingLayer, REQUEST_ID_HEADER};
