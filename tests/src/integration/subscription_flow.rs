//! # Subscription To Notification Flow
//!
//! ```text
//! SubscriptionRecord ─→ SubscriptionStore ─→ NotificationDispatcher ─→ transport
//!                         (ry-02)              (ry-03)        proof rebuilt by ry-01
//! ```

use super::fixtures::*;
use ry_01_consent_codec::{build_consent_message, decode_consent_proof, verify_consent};
use ry_02_subscription_store::{RocksDbConfig, RocksDbSetStore, SubscriptionStore};
use ry_03_notification_dispatch::testing::RecordingTransport;
use ry_03_notification_dispatch::{
    DispatchConfig, NotificationDispatcher, RetryPolicy, TagSenderRegistry,
};
use shared_crypto::Wallet;
use shared_types::{SubscriptionRecord, Tag};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::Instant;

fn dispatcher(
    store: &SubscriptionStore,
    transport: &RecordingTransport,
    senders: TagSenderRegistry,
    config: DispatchConfig,
) -> NotificationDispatcher {
    NotificationDispatcher::new(
        Arc::new(store.clone()),
        Arc::new(transport.clone()),
        Arc::new(senders),
        config,
    )
}

fn subscribe(store: &SubscriptionStore, tag: Tag, address: &str, signature: &str, ts: u64) {
    let record = SubscriptionRecord::new(address, signature, ts).unwrap();
    store.add(tag, &record).unwrap();
}

#[tokio::test]
async fn test_reference_flow() {
    let store = memory_store();
    let transport = RecordingTransport::new();
    let sender = Wallet::random();
    let dispatcher = dispatcher(
        &store,
        &transport,
        TagSenderRegistry::new(sender.clone()),
        DispatchConfig::for_testing(),
    );

    subscribe(&store, Tag::Food, SUBSCRIBER, SIGNATURE, TIMESTAMP_MS);
    assert_eq!(store.list_tags_for_address(SUBSCRIBER).unwrap(), vec![Tag::Food]);

    let report = dispatcher.dispatch("Food").await.unwrap();
    assert_eq!(report.delivered_count(), 1);
    assert_eq!(report.summary(), "Notifications sent for tag: Food");

    let channels = transport.channels();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].peer, SUBSCRIBER);
    assert_eq!(channels[0].sender, sender.address());
    assert_eq!(hex::encode(&channels[0].consent_proof), REFERENCE_PROOF_HEX);

    let proof = decode_consent_proof(&channels[0].consent_proof).unwrap();
    assert_eq!(proof.signature, SIGNATURE);
    assert_eq!(proof.timestamp_ms, TIMESTAMP_MS);

    assert_eq!(transport.closes(), 1);
}

#[tokio::test]
async fn test_flow_over_rocksdb_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("subs").to_string_lossy().to_string();

    {
        let store = SubscriptionStore::new(Arc::new(
            RocksDbSetStore::open(RocksDbConfig::for_testing(path.clone())).unwrap(),
        ));
        subscribe(&store, Tag::ArtAndFashion, SUBSCRIBER, SIGNATURE, TIMESTAMP_MS);
        subscribe(&store, Tag::ArtAndFashion, SUBSCRIBER, SIGNATURE, TIMESTAMP_MS);
    }

    let store = SubscriptionStore::new(Arc::new(
        RocksDbSetStore::open(RocksDbConfig::for_testing(path)).unwrap(),
    ));
    let transport = RecordingTransport::new();
    let report = dispatcher(
        &store,
        &transport,
        TagSenderRegistry::new(Wallet::random()),
        DispatchConfig::for_testing(),
    )
    .dispatch("Art & Fashion")
    .await
    .unwrap();

    // Duplicate subscription stored once
    assert_eq!(report.deliveries.len(), 1);
    assert_eq!(
        transport.messages()[0].text,
        "Get inspired by the latest art & fashion photo on Real You!"
    );
}

#[tokio::test]
async fn test_unknown_tag_uses_default_identity() {
    let store = memory_store();
    let transport = RecordingTransport::new();
    let default_sender = Wallet::random();
    let senders = TagSenderRegistry::new(default_sender.clone()).with_sender(Tag::Food, Wallet::random());

    assert!(store.list_subscriber_addresses("Cars").unwrap().is_empty());

    let report = dispatcher(&store, &transport, senders, DispatchConfig::for_testing())
        .dispatch("Cars")
        .await
        .unwrap();

    assert_eq!(report.sender, default_sender.address());
    assert_eq!(
        report.text,
        "A new photo tagged with Cars has been uploaded to Real You!"
    );
    assert!(report.deliveries.is_empty());
    assert_eq!(transport.connects(), vec![default_sender.address()]);
}

#[tokio::test]
async fn test_tag_sender_used_for_its_subscribers() {
    let store = memory_store();
    let transport = RecordingTransport::new();
    let pets_sender = Wallet::random();
    let senders = TagSenderRegistry::new(Wallet::random()).with_sender(Tag::Pets, pets_sender.clone());

    subscribe(&store, Tag::Pets, "0xDEF", "sig2", TIMESTAMP_MS + 1);
    dispatcher(&store, &transport, senders, DispatchConfig::for_testing())
        .dispatch("Pets")
        .await
        .unwrap();

    let messages = transport.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].sender, pets_sender.address());
    assert_eq!(messages[0].peer, "0xDEF");
}

#[tokio::test(start_paused = true)]
async fn test_pacing_applies_per_subscriber() {
    let store = memory_store();
    let transport = RecordingTransport::new();
    for (i, address) in ["0xA1", "0xA2", "0xA3"].iter().enumerate() {
        subscribe(&store, Tag::Travel, address, "sig", TIMESTAMP_MS + i as u64);
    }

    let config = DispatchConfig {
        pacing: Duration::from_millis(1000),
        ..DispatchConfig::for_testing()
    };
    let started = Instant::now();
    dispatcher(&store, &transport, TagSenderRegistry::new(Wallet::random()), config)
        .dispatch("Travel")
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_millis(3000));
    assert_eq!(transport.messages().len(), 3);
}

#[tokio::test]
async fn test_one_failing_subscriber_does_not_stop_batch() {
    let store = memory_store();
    let transport = RecordingTransport::new();
    subscribe(&store, Tag::Nature, "0xA1", "sig", TIMESTAMP_MS);
    subscribe(&store, Tag::Nature, "0xA2", "sig", TIMESTAMP_MS);
    transport.fail_peer("0xA1", 1);

    let dispatcher = dispatcher(
        &store,
        &transport,
        TagSenderRegistry::new(Wallet::random()),
        DispatchConfig::for_testing(),
    );

    let report = dispatcher.dispatch("Nature").await.unwrap();
    assert_eq!(report.delivered_count(), 1);
    assert_eq!(report.failed_count(), 1);

    // A second pass with one retry reaches both
    transport.fail_peer("0xA1", 1);
    let report = dispatcher
        .dispatch_with_retry("Nature", RetryPolicy::OnceAfter(Duration::ZERO))
        .await
        .unwrap();
    assert_eq!(report.delivered_count(), 2);
    assert_eq!(report.error_count(), 1);
}

#[test]
fn test_signed_consent_verifies_against_tag_sender() {
    let sender = Wallet::random();
    let subscriber = Wallet::random();
    let sender_address = sender.address().to_checksum();

    let message = build_consent_message(&sender_address, TIMESTAMP_MS).unwrap();
    assert!(message.contains("Current Time: Tue, 14 Nov 2023 22:13:20 GMT"));
    assert!(message.contains(&format!("From Address: {}", sender_address)));

    let signature = subscriber.sign_message(message.as_bytes()).unwrap().to_hex();
    let subscriber_address = subscriber.address().to_checksum();

    assert!(verify_consent(&subscriber_address, &sender_address, &signature, TIMESTAMP_MS).is_ok());
    // Consent is bound to the sender and the timestamp
    let other_sender = Wallet::random().address().to_checksum();
    assert!(verify_consent(&subscriber_address, &other_sender, &signature, TIMESTAMP_MS).is_err());
    assert!(verify_consent(&subscriber_address, &sender_address, &signature, TIMESTAMP_MS + 1000).is_err());
}
