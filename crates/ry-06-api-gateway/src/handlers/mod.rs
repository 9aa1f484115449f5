//! HTTP handlers.

pub mod analysis;
pub mod attestation;
pub mod notify;
pub mod subscriptions;
pub mod system;

use crate::context::GatewayContext;
use crate::domain::error::{ApiError, ApiResult};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::http::{Method, StatusCode};
use axum::response::Response;
use axum::Json;
use ry_02_subscription_store::{StoreError, SubscriptionStore};
use std::future::{ready, Ready};
use std::sync::Arc;

/// Handler state.
pub type SharedContext = Arc<GatewayContext>;

/// Request body, or an empty one if the body is missing or not JSON.
///
/// An empty body makes the handler answer with its own "required" message.
/// Oversized bodies are still refused.
pub(crate) fn body_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => Err(
            ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large"),
        ),
        Err(_) => Ok(T::default()),
    }
}

pub(crate) fn query_or_default<T: Default>(query: Result<Query<T>, QueryRejection>) -> T {
    query.map(|Query(q)| q).unwrap_or_default()
}

/// Run a store call off the async workers.
pub(crate) async fn with_store<T, F>(store: &SubscriptionStore, f: F) -> Result<T, StoreError>
where
    F: FnOnce(&SubscriptionStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(|e| StoreError::Io {
            message: e.to_string(),
        })?
}

/// Fallback for a route's unsupported verbs.
pub fn method_not_allowed(
    allow: &'static str,
) -> impl Fn(Method) -> Ready<Response> + Clone + Send + Sync + 'static {
    move |method: Method| ready(ApiError::into_method_not_allowed_response(&method, allow))
}

pub async fn not_found() -> ApiError {
    ApiError::not_found()
}
