//! `/health` and `/metrics`.

use super::SharedContext;
use crate::domain::types::HealthResponse;
use axum::extract::State;
use axum::Json;

pub async fn health(State(ctx): State<SharedContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: ctx.service_name().to_string(),
        version: crate::VERSION.to_string(),
    })
}

pub async fn metrics(State(ctx): State<SharedContext>) -> Json<serde_json::Value> {
    Json(ctx.metrics().to_json())
}
