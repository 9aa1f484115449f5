//! # Dispatch Over The HTTP Relay
//!
//! Store, dispatcher and the relay transport together against a mock relay.

use super::fixtures::*;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ry_03_notification_dispatch::{
    DispatchConfig, HttpRelayTransport, NotificationDispatcher, RelayConfig, TagSenderRegistry,
    SENDER_SIGNATURE_HEADER,
};
use shared_crypto::{recover_message_signer, RecoverableSignature, Wallet};
use shared_types::{SubscriptionRecord, Tag};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn relay_dispatcher(
    server: &MockServer,
    store: &ry_02_subscription_store::SubscriptionStore,
    senders: TagSenderRegistry,
) -> NotificationDispatcher {
    let transport =
        HttpRelayTransport::new(RelayConfig::new(server.uri()).with_token("relay-token")).unwrap();
    NotificationDispatcher::new(
        Arc::new(store.clone()),
        Arc::new(transport),
        Arc::new(senders),
        DispatchConfig::for_testing(),
    )
}

async fn mount_messages(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path_regex(r"^/v1/conversations/[^/]+/messages$"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_reference_flow_over_relay() {
    let server = MockServer::start().await;
    let food_sender = Wallet::random();
    let from = food_sender.address().to_checksum();
    let proof = hex::decode(REFERENCE_PROOF_HEX).unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/conversations"))
        .and(body_partial_json(serde_json::json!({
            "from": from,
            "to": SUBSCRIBER,
            "consentProof": BASE64.encode(&proof),
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "conversationId": "conv-7" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/conversations/conv-7/messages"))
        .and(body_partial_json(serde_json::json!({
            "from": from,
            "text": "A delicious new food photo is waiting for you on Real You!",
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let store = memory_store();
    store
        .add(
            Tag::Food,
            &SubscriptionRecord::new(SUBSCRIBER, SIGNATURE, TIMESTAMP_MS).unwrap(),
        )
        .unwrap();

    let senders = TagSenderRegistry::new(Wallet::random()).with_sender(Tag::Food, food_sender.clone());
    let report = relay_dispatcher(&server, &store, senders)
        .await
        .dispatch("Food")
        .await
        .unwrap();
    assert_eq!(report.delivered_count(), 1);

    // Every relay call is signed by the tag's sender
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        let signature = request
            .headers
            .get(SENDER_SIGNATURE_HEADER)
            .unwrap()
            .to_str()
            .unwrap();
        let signature = RecoverableSignature::from_hex(signature).unwrap();
        let signer = recover_message_signer(&request.body, &signature).unwrap();
        assert_eq!(signer, food_sender.address());
        assert_eq!(
            request.headers.get("authorization").unwrap().to_str().unwrap(),
            "Bearer relay-token"
        );
    }
}

#[tokio::test]
async fn test_relay_rejection_is_recorded_not_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/conversations"))
        .and(body_partial_json(serde_json::json!({ "to": "0xBAD" })))
        .respond_with(ResponseTemplate::new(403).set_body_string("consent proof rejected"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/conversations"))
        .and(body_partial_json(serde_json::json!({ "to": "0xGOOD" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "conversationId": "ok" })),
        )
        .mount(&server)
        .await;
    mount_messages(&server).await;

    let store = memory_store();
    for address in ["0xBAD", "0xGOOD"] {
        store
            .add(
                Tag::Sports,
                &SubscriptionRecord::new(address, SIGNATURE, TIMESTAMP_MS).unwrap(),
            )
            .unwrap();
    }

    let report = relay_dispatcher(&server, &store, TagSenderRegistry::new(Wallet::random()))
        .await
        .dispatch("Sports")
        .await
        .unwrap();

    assert_eq!(report.delivered_count(), 1);
    assert_eq!(report.failed_count(), 1);
    let failed = report
        .deliveries
        .iter()
        .find(|d| !d.is_delivered())
        .unwrap();
    assert_eq!(failed.address, "0xBAD");
}

#[tokio::test]
async fn test_unreachable_relay_fails_each_subscriber() {
    let store = memory_store();
    store
        .add(
            Tag::People,
            &SubscriptionRecord::new(SUBSCRIBER, SIGNATURE, TIMESTAMP_MS).unwrap(),
        )
        .unwrap();

    // Nothing listens on the discard port
    let transport = HttpRelayTransport::new(RelayConfig::new("http://127.0.0.1:9")).unwrap();
    let dispatcher = NotificationDispatcher::new(
        Arc::new(store),
        Arc::new(transport),
        Arc::new(TagSenderRegistry::new(Wallet::random())),
        DispatchConfig::for_testing(),
    );

    let report = dispatcher.dispatch("People").await.unwrap();
    assert_eq!(report.failed_count(), 1);
}
