//! # Gateway End To End
//!
//! A photo's life through the HTTP surface, over a RocksDB store:
//! consent message, signed subscribe, analysis, attestation, notify.

use super::fixtures::*;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use ry_01_consent_codec::decode_consent_proof;
use ry_02_subscription_store::{RocksDbConfig, RocksDbSetStore, SubscriptionStore};
use ry_03_notification_dispatch::testing::RecordingTransport;
use ry_03_notification_dispatch::{DispatchConfig, NotificationDispatcher, TagSenderRegistry};
use ry_04_image_analysis::{AnalysisConfig, ImageAnalysisRelay, PollingConfig};
use ry_05_attestation::AttestationRelay;
use ry_06_api_gateway::{ApiGatewayService, GatewayConfig, GatewayContext};
use serde_json::{json, Value};
use shared_crypto::Wallet;
use shared_types::Tag;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

const DOG: &str = r#"{"isPhotoreal":true,"photoDescription":"a dog on a beach","listOfTags":["Pets","Travel"]}"#;

struct Node {
    router: Router,
    transport: RecordingTransport,
    senders: Arc<TagSenderRegistry>,
    oracle: Arc<ScriptedOracle>,
    attestor: Arc<RecordingAttestor>,
    _dir: TempDir,
}

fn node() -> Node {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("subs").to_string_lossy().to_string();
    let store = SubscriptionStore::new(Arc::new(
        RocksDbSetStore::open(RocksDbConfig::for_testing(path)).unwrap(),
    ));

    let senders = Arc::new(
        TagSenderRegistry::new(Wallet::random())
            .with_sender(Tag::Pets, Wallet::random())
            .with_sender(Tag::Travel, Wallet::random()),
    );
    let transport = RecordingTransport::new();
    let dispatcher = NotificationDispatcher::new(
        Arc::new(store.clone()),
        Arc::new(transport.clone()),
        Arc::clone(&senders),
        DispatchConfig::for_testing(),
    );

    let oracle = Arc::new(ScriptedOracle::new(DOG, 1));
    let analysis = ImageAnalysisRelay::new(
        oracle.clone(),
        AnalysisConfig {
            polling: PollingConfig {
                initial_delay: Duration::ZERO,
                max_attempts: 3,
                max_delay: Duration::ZERO,
            },
            ..AnalysisConfig::default()
        },
    );
    let attestor = Arc::new(RecordingAttestor::default());

    let context = GatewayContext::new(store, Arc::clone(&senders))
        .with_dispatcher(Arc::new(dispatcher))
        .with_analysis(Arc::new(analysis))
        .with_attestation(Arc::new(AttestationRelay::new(attestor.clone())))
        .with_consent_verification(true);
    let router = ApiGatewayService::new(GatewayConfig::for_testing(), context)
        .unwrap()
        .router();

    Node {
        router,
        transport,
        senders,
        oracle,
        attestor,
        _dir: dir,
    }
}

async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Fetch the consent message for `tag`, sign it and subscribe.
async fn subscribe_signed(router: &Router, subscriber: &Wallet, tag: &str) -> String {
    let uri = format!(
        "/consentMessage?tag={}&timestamp={}",
        tag.replace(' ', "%20").replace('&', "%26"),
        TIMESTAMP_MS
    );
    let (status, consent) = call(router, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let message = consent["message"].as_str().unwrap();
    let signature = subscriber.sign_message(message.as_bytes()).unwrap().to_hex();

    let (status, body) = call(
        router,
        Method::POST,
        "/subscribe",
        Some(json!({
            "tag": tag,
            "address": subscriber.address().to_checksum(),
            "signature": signature,
            "currentTime": TIMESTAMP_MS,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    signature
}

#[tokio::test]
async fn test_photo_lifecycle() {
    let node = node();
    let subscriber = Wallet::random();
    let address = subscriber.address().to_checksum();

    let signature = subscribe_signed(&node.router, &subscriber, "Pets").await;
    subscribe_signed(&node.router, &subscriber, "Art & Fashion").await;

    let (_, body) = call(
        &node.router,
        Method::GET,
        &format!("/userSubscriptions?address={}", address),
        None,
    )
    .await;
    assert_eq!(body, json!({ "subscriptions": ["Pets", "Art & Fashion"] }));

    // Upload: analyze, attest, then notify each returned tag
    let (status, analysis) = call(
        &node.router,
        Method::POST,
        "/gpt4vision",
        Some(json!({ "ipfsUrl": "QmDogBeach" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(analysis["listOfTags"], json!(["Pets", "Travel"]));
    assert_eq!(node.oracle.polls(), 2);

    let (status, attestation) = call(
        &node.router,
        Method::POST,
        "/createAttestation",
        Some(json!({ "photoId": "photo-9", "ipfsHash": "QmDogBeach" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(attestation["attestationId"], json!("0x1"));
    assert_eq!(node.attestor.requests()[0].ipfs_hash, "QmDogBeach");

    for tag in analysis["listOfTags"].as_array().unwrap() {
        let (status, body) =
            call(&node.router, Method::POST, "/notify", Some(json!({ "tag": tag }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "message": format!("Notifications sent for tag: {}", tag.as_str().unwrap()) })
        );
    }

    // Only the Pets subscription reaches the subscriber, from the Pets sender
    let channels = node.transport.channels();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].peer, address);
    assert_eq!(channels[0].sender, node.senders.sender_for(Tag::Pets).address());

    let proof = decode_consent_proof(&channels[0].consent_proof).unwrap();
    assert_eq!(proof.signature, signature);
    assert_eq!(proof.timestamp_ms, TIMESTAMP_MS);

    // Travel has no subscribers but its sender still connected
    assert_eq!(node.transport.connects().len(), 2);
}

#[tokio::test]
async fn test_signature_for_other_tag_sender_rejected() {
    let node = node();
    let subscriber = Wallet::random();

    // Signed for the Travel sender, submitted for Pets
    let (_, consent) = call(
        &node.router,
        Method::GET,
        &format!("/consentMessage?tag=Travel&timestamp={}", TIMESTAMP_MS),
        None,
    )
    .await;
    let signature = subscriber
        .sign_message(consent["message"].as_str().unwrap().as_bytes())
        .unwrap()
        .to_hex();

    let (status, _) = call(
        &node.router,
        Method::POST,
        "/subscribe",
        Some(json!({
            "tag": "Pets",
            "address": subscriber.address().to_checksum(),
            "signature": signature,
            "currentTime": TIMESTAMP_MS,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = call(&node.router, Method::GET, "/getSubscriptions?tag=Pets", None).await;
    assert_eq!(body, json!({ "addresses": [] }));
}

#[tokio::test]
async fn test_metrics_follow_traffic() {
    let node = node();
    let subscriber = Wallet::random();
    subscribe_signed(&node.router, &subscriber, "Food").await;
    call(&node.router, Method::GET, "/nowhere", None).await;

    let (status, metrics) = call(&node.router, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(metrics["subscriptions"]["added"], json!(1));
}
