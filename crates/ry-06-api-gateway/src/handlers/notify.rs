//! `POST /notify`

use super::{body_or_default, SharedContext};
use crate::domain::error::{messages, ApiError, ApiResult};
use crate::domain::types::{required, MessageResponse, NotifyRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::{error, info};

/// Message every subscriber of the tag. Runs to completion; per-subscriber
/// failures are in the dispatch report, not the response.
pub async fn notify(
    State(ctx): State<SharedContext>,
    payload: Result<Json<NotifyRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let request = body_or_default(payload)?;
    let label = required(&request.tag)
        .ok_or_else(|| ApiError::bad_request(messages::TAG_REQUIRED))?;

    let dispatcher = ctx.dispatcher().ok_or_else(|| {
        error!(tag = %label, "Notify called without a messaging transport");
        ApiError::internal(messages::NOTIFY_UNCONFIGURED)
    })?;

    let report = dispatcher.dispatch(label).await.map_err(|e| {
        error!(tag = %label, error = %e, "Notification dispatch failed");
        ApiError::from(e)
    })?;

    ctx.metrics()
        .record_dispatch(report.delivered_count(), report.failed_count());
    info!(
        tag = %label,
        delivered = report.delivered_count(),
        failed = report.failed_count(),
        "Notify completed"
    );

    Ok(Json(MessageResponse {
        message: report.summary(),
    }))
}
