//! Subscription endpoints: `/subscribe`, `/userSubscriptions`,
//! `/getSubscriptions` and `/consentMessage`.

use super::{body_or_default, query_or_default, with_store, SharedContext};
use crate::domain::error::{messages, ApiError, ApiResult};
use crate::domain::types::{
    is_present, parse_timestamp, required, AddressQuery, AddressesResponse, ConsentMessageQuery,
    ConsentMessageResponse, MessageResponse, SubscribeRequest, SubscriptionsResponse, TagQuery,
};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use ry_01_consent_codec::{build_consent_message, validate_signature, verify_consent};
use shared_types::{SubscriptionRecord, Tag};
use tracing::{debug, error, info, warn};

/// `POST /subscribe`
pub async fn subscribe(
    State(ctx): State<SharedContext>,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let request = body_or_default(payload)?;

    let (Some(label), Some(address), Some(signature), true) = (
        required(&request.tag),
        required(&request.address),
        required(&request.signature),
        is_present(&request.current_time),
    ) else {
        return Err(ApiError::bad_request(messages::SUBSCRIBE_FIELDS_REQUIRED));
    };

    let tag: Tag = label.parse()?;
    let timestamp = request
        .current_time
        .as_ref()
        .and_then(parse_timestamp)
        .ok_or_else(|| ApiError::bad_request("currentTime must be a millisecond timestamp"))?;
    validate_signature(signature)?;

    if ctx.verifies_consent() {
        let sender = ctx.senders().sender_for(tag).address().to_checksum();
        verify_consent(address, &sender, signature, timestamp).map_err(|e| {
            warn!(tag = %tag, address, error = %e, "Consent signature rejected");
            ApiError::bad_request("Consent signature does not match address")
        })?;
    }

    let record = SubscriptionRecord::new(address, signature, timestamp)?;
    let added = with_store(ctx.store(), move |store| store.add(tag, &record))
        .await
        .map_err(|e| {
            error!(tag = %tag, error = %e, "Failed to store subscription");
            ApiError::internal(messages::SUBSCRIBE_FAILED)
        })?;

    ctx.metrics().record_subscription(added);
    info!(tag = %tag, address, added, "Subscription stored");

    Ok(Json(MessageResponse {
        message: messages::SUBSCRIBE_SUCCESS.to_string(),
    }))
}

/// `GET /userSubscriptions?address=`
pub async fn user_subscriptions(
    State(ctx): State<SharedContext>,
    query: Result<Query<AddressQuery>, QueryRejection>,
) -> ApiResult<Json<SubscriptionsResponse>> {
    let query = query_or_default(query);
    let address = required(&query.address)
        .ok_or_else(|| ApiError::bad_request(messages::ADDRESS_QUERY_REQUIRED))?
        .to_string();

    let subscriptions = with_store(ctx.store(), {
        let address = address.clone();
        move |store| store.list_tags_for_address(&address)
    })
    .await
    .map_err(|e| {
        error!(address = %address, error = %e, "Error retrieving user subscriptions");
        ApiError::internal(messages::USER_SUBSCRIPTIONS_FAILED)
    })?;

    debug!(address = %address, count = subscriptions.len(), "User subscriptions");
    Ok(Json(SubscriptionsResponse { subscriptions }))
}

/// `GET /getSubscriptions?tag=`
///
/// Labels outside the enumeration have no subscribers.
pub async fn get_subscriptions(
    State(ctx): State<SharedContext>,
    query: Result<Query<TagQuery>, QueryRejection>,
) -> ApiResult<Json<AddressesResponse>> {
    let query = query_or_default(query);
    let label = required(&query.tag)
        .ok_or_else(|| ApiError::bad_request(messages::TAG_QUERY_REQUIRED))?
        .to_string();

    let addresses = with_store(ctx.store(), {
        let label = label.clone();
        move |store| store.list_subscriber_addresses(&label)
    })
    .await
    .map_err(|e| {
        error!(tag = %label, error = %e, "Error retrieving subscriptions");
        ApiError::internal(messages::SUBSCRIPTIONS_FAILED)
    })?;

    Ok(Json(AddressesResponse { addresses }))
}

/// `GET /consentMessage?tag=&timestamp=`
///
/// The text a subscriber must sign for `tag`, naming the tag's sender.
pub async fn consent_message(
    State(ctx): State<SharedContext>,
    query: Result<Query<ConsentMessageQuery>, QueryRejection>,
) -> ApiResult<Json<ConsentMessageResponse>> {
    let query = query_or_default(query);
    let tag: Tag = required(&query.tag)
        .ok_or_else(|| ApiError::bad_request(messages::TAG_QUERY_REQUIRED))?
        .parse()?;

    let timestamp = match required(&query.timestamp) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ApiError::bad_request("timestamp must be a millisecond timestamp"))?,
        None => u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default(),
    };

    let sender_address = ctx.senders().sender_for(tag).address().to_checksum();
    let message = build_consent_message(&sender_address, timestamp)?;

    Ok(Json(ConsentMessageResponse {
        sender_address,
        timestamp,
        message,
    }))
}
