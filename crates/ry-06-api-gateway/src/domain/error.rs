//! API Gateway error types.
//!
//! Every failure leaves the gateway as `{"error": "<text>"}` with an HTTP
//! status. Domain errors convert into the status and text clients of the
//! original endpoints expect.

use super::config::ConfigError;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use ry_01_consent_codec::ConsentError;
use ry_02_subscription_store::StoreError;
use ry_03_notification_dispatch::DispatchError;
use ry_04_image_analysis::AnalysisError;
use ry_05_attestation::AttestationError;
use shared_types::{RecordError, UnknownTag};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Client-facing messages.
pub mod messages {
    pub const SUBSCRIBE_FIELDS_REQUIRED: &str = "Address and tag are required";
    pub const SUBSCRIBE_FAILED: &str = "Failed to add subscription";
    pub const SUBSCRIBE_SUCCESS: &str = "Subscription added successfully";
    pub const ADDRESS_QUERY_REQUIRED: &str = "Address is required as a query parameter";
    pub const USER_SUBSCRIPTIONS_FAILED: &str = "Failed to retrieve user subscriptions";
    pub const TAG_QUERY_REQUIRED: &str = "Tag is required as a query parameter";
    pub const SUBSCRIPTIONS_FAILED: &str = "Failed to retrieve subscriptions";
    pub const TAG_REQUIRED: &str = "Tag is required";
    pub const NOTIFY_FAILED: &str = "Failed to send notifications";
    pub const NOTIFY_UNCONFIGURED: &str = "Notification sender is not configured";
    pub const IMAGE_REQUIRED: &str = "IPFS URL is required in the request body";
    pub const ANALYSIS_UNCONFIGURED: &str = "Ethereum private key is not set";
    pub const ANALYSIS_FAILED: &str = "Failed to analyze the image";
    pub const ATTESTATION_FIELDS_REQUIRED: &str =
        "photoId and ipfsHash are required in the request body";
    pub const ATTESTATION_FAILED: &str = "Failed to create attestation";
    pub const ATTESTATION_SUCCESS: &str = "Attestation created";
}

/// HTTP error returned by handlers and middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 500
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found")
    }

    pub fn method_not_allowed(method: &Method) -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("Method {} Not Allowed", method),
        )
    }

    pub fn rate_limited() -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded")
    }

    pub fn timeout(limit: Duration) -> Self {
        Self::new(
            StatusCode::GATEWAY_TIMEOUT,
            format!("Request exceeded {}ms timeout", limit.as_millis()),
        )
    }

    /// Response for a wrong verb, with the `Allow` header set.
    pub fn into_method_not_allowed_response(method: &Method, allow: &'static str) -> Response {
        let mut response = Self::method_not_allowed(method).into_response();
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static(allow));
        response
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<UnknownTag> for ApiError {
    fn from(err: UnknownTag) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<ConsentError> for ApiError {
    fn from(err: ConsentError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(_: StoreError) -> Self {
        Self::internal(messages::SUBSCRIBE_FAILED)
    }
}

impl From<DispatchError> for ApiError {
    fn from(_: DispatchError) -> Self {
        Self::internal(messages::NOTIFY_FAILED)
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::MissingImage => Self::bad_request(messages::IMAGE_REQUIRED),
            _ => Self::internal(messages::ANALYSIS_FAILED),
        }
    }
}

impl From<AttestationError> for ApiError {
    fn from(err: AttestationError) -> Self {
        match err {
            AttestationError::MissingField(_) => {
                Self::bad_request(messages::ATTESTATION_FIELDS_REQUIRED)
            }
            _ => Self::internal(messages::ATTESTATION_FAILED),
        }
    }
}

/// Errors starting or running the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[source] std::io::Error),
}
