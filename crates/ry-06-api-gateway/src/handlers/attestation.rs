//! `POST /createAttestation`

use super::{body_or_default, SharedContext};
use crate::domain::error::{messages, ApiError, ApiResult};
use crate::domain::types::{required, AttestationRequest, AttestationResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::error;

pub async fn create_attestation(
    State(ctx): State<SharedContext>,
    payload: Result<Json<AttestationRequest>, JsonRejection>,
) -> ApiResult<Json<AttestationResponse>> {
    let request = body_or_default(payload)?;
    let (Some(photo_id), Some(ipfs_hash)) =
        (required(&request.photo_id), required(&request.ipfs_hash))
    else {
        return Err(ApiError::bad_request(messages::ATTESTATION_FIELDS_REQUIRED));
    };

    let relay = ctx.attestation().ok_or_else(|| {
        error!("Attestation signer is not configured");
        ApiError::internal(messages::ATTESTATION_FAILED)
    })?;

    let receipt = relay
        .create_attestation(photo_id, ipfs_hash)
        .await
        .map_err(|e| {
            error!(photo_id, error = %e, "Error creating attestation");
            ApiError::from(e)
        })?;

    ctx.metrics().record_attestation();
    Ok(Json(AttestationResponse {
        message: messages::ATTESTATION_SUCCESS.to_string(),
        attestation_id: receipt.attestation_id,
        tx_hash: receipt.tx_hash,
        indexing_value: receipt.indexing_value,
    }))
}
