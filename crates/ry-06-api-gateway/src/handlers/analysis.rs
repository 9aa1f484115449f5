//! `POST /gpt4vision`

use super::{body_or_default, SharedContext};
use crate::domain::error::{messages, ApiError, ApiResult};
use crate::domain::types::{required, AnalyzeRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use ry_04_image_analysis::AnalysisResult;
use tracing::{error, info};

pub async fn analyze_image(
    State(ctx): State<SharedContext>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalysisResult>> {
    let request = body_or_default(payload)?;
    let image_ref =
        required(&request.ipfs_url).ok_or_else(|| ApiError::bad_request(messages::IMAGE_REQUIRED))?;

    let relay = ctx.analysis().ok_or_else(|| {
        error!("Ethereum private key is not set");
        ApiError::internal(messages::ANALYSIS_UNCONFIGURED)
    })?;

    let result = relay.analyze(image_ref).await.map_err(|e| {
        error!(image = %image_ref, error = %e, "Image analysis failed");
        ApiError::from(e)
    })?;

    ctx.metrics().record_analysis();
    info!(
        image = %image_ref,
        photoreal = result.is_photoreal,
        tags = result.list_of_tags.len(),
        "Image analyzed"
    );
    Ok(Json(result))
}
