//! # Real You Subsystem Benchmarks
//!
//! | Subsystem | Hot path | Target |
//! |-----------|----------|--------|
//! | ry-01 Consent Codec | proof encode/decode, consent message | < 10µs |
//! | ry-01 Consent Codec | signature recovery | < 1ms |
//! | ry-02 Subscription Store | add, list by tag, tags for address | < 1ms |
//! | ry-04 Image Analysis | parse oracle answer | < 50µs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ry_01_consent_codec::{
    build_consent_message, build_consent_proof, decode_consent_proof, verify_consent,
};
use ry_02_subscription_store::{InMemorySetStore, SubscriptionStore};
use ry_04_image_analysis::parse_analysis;
use shared_crypto::Wallet;
use shared_types::{SubscriptionRecord, Tag};
use std::sync::Arc;
use std::time::Duration;

const TIMESTAMP_MS: u64 = 1_700_000_000_000;

// ============================================================================
// RY-01: Consent Codec
// ============================================================================

fn bench_consent_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("ry-01-consent-codec");

    let wallet = Wallet::random();
    let sender = wallet.address().to_checksum();
    let message = build_consent_message(&sender, TIMESTAMP_MS).unwrap();
    let signature = wallet.sign_message(message.as_bytes()).unwrap().to_hex();
    let proof = build_consent_proof(&signature, TIMESTAMP_MS).unwrap();

    group.bench_function("build_proof", |b| {
        b.iter(|| black_box(build_consent_proof(black_box(&signature), TIMESTAMP_MS)))
    });

    group.bench_function("decode_proof", |b| {
        b.iter(|| black_box(decode_consent_proof(black_box(&proof))))
    });

    group.bench_function("consent_message", |b| {
        b.iter(|| black_box(build_consent_message(black_box(&sender), TIMESTAMP_MS)))
    });

    group.measurement_time(Duration::from_secs(10));
    let subscriber = wallet.address().to_checksum();
    group.bench_function("verify_consent", |b| {
        b.iter(|| {
            black_box(verify_consent(
                &subscriber,
                &sender,
                black_box(&signature),
                TIMESTAMP_MS,
            ))
        })
    });

    group.finish();
}

// ============================================================================
// RY-02: Subscription Store
// ============================================================================

fn populated_store(subscribers: usize) -> SubscriptionStore {
    let store = SubscriptionStore::new(Arc::new(InMemorySetStore::new()));
    for i in 0..subscribers {
        let record =
            SubscriptionRecord::new(format!("0x{:040x}", i), "sig", TIMESTAMP_MS + i as u64).unwrap();
        store.add(Tag::ALL[i % Tag::ALL.len()], &record).unwrap();
    }
    store
}

fn bench_subscription_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("ry-02-subscription-store");

    group.bench_function("add_duplicate", |b| {
        let store = populated_store(0);
        let record = SubscriptionRecord::new("0xABC", "sig1", TIMESTAMP_MS).unwrap();
        b.iter(|| black_box(store.add(Tag::Food, &record)))
    });

    for size in [100, 1_000, 10_000] {
        let store = populated_store(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("list_subscribers", size), &store, |b, store| {
            b.iter(|| black_box(store.list_subscribers(Tag::Food)))
        });

        let address = format!("0x{:040x}", size / 2);
        group.bench_with_input(
            BenchmarkId::new("tags_for_address", size),
            &(store, address),
            |b, (store, address)| b.iter(|| black_box(store.list_tags_for_address(address))),
        );
    }

    group.finish();
}

// ============================================================================
// RY-04: Image Analysis
// ============================================================================

fn bench_analysis_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("ry-04-image-analysis");

    let clean = r#"{"isPhotoreal":true,"photoDescription":"a dog","listOfTags":["Pets","InvalidTag"]}"#;
    let wrapped = format!("Here is the analysis you asked for:\n{}\nThanks.", clean);

    group.bench_function("parse_clean", |b| {
        b.iter(|| black_box(parse_analysis(black_box(clean))))
    });

    group.bench_function("parse_wrapped", |b| {
        b.iter(|| black_box(parse_analysis(black_box(&wrapped))))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_consent_codec,
    bench_subscription_store,
    bench_analysis_parsing,
);

criterion_main!(benches);
