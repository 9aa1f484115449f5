//! # Image Analysis Flow
//!
//! Relay polling against a scripted oracle, with the paused clock.

use super::fixtures::ScriptedOracle;
use ry_04_image_analysis::{AnalysisConfig, AnalysisError, ImageAnalysisRelay, PollingConfig};
use shared_types::Tag;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

const DOG: &str =
    r#"{"isPhotoreal":true,"photoDescription":"a dog","listOfTags":["Pets","InvalidTag"]}"#;

fn relay(oracle: Arc<ScriptedOracle>) -> ImageAnalysisRelay {
    ImageAnalysisRelay::new(oracle, AnalysisConfig::default())
}

#[tokio::test(start_paused = true)]
async fn test_reference_analysis() {
    let oracle = Arc::new(ScriptedOracle::new(DOG, 2));
    let started = Instant::now();

    let result = relay(oracle.clone()).analyze("QmDogPhoto").await.unwrap();

    assert!(result.is_photoreal);
    assert_eq!(result.photo_description, "a dog");
    assert_eq!(result.list_of_tags, vec![Tag::Pets]);
    assert_eq!(oracle.polls(), 3);
    assert_eq!(oracle.submitted(), vec!["https://ipfs.io/ipfs/QmDogPhoto".to_string()]);

    // Initial 2s, then 2s and 4s of back-off
    assert!(started.elapsed() >= Duration::from_millis(8000));
}

#[tokio::test(start_paused = true)]
async fn test_answer_wrapped_in_prose() {
    let answer = format!("Sure! Here is the analysis:\n{}\nLet me know.", DOG);
    let oracle = Arc::new(ScriptedOracle::new(answer, 0));

    let result = relay(oracle).analyze("QmDogPhoto").await.unwrap();
    assert_eq!(result.list_of_tags, vec![Tag::Pets]);
}

#[tokio::test(start_paused = true)]
async fn test_polling_is_bounded() {
    let oracle = Arc::new(ScriptedOracle::new(DOG, u32::MAX));
    let config = AnalysisConfig {
        polling: PollingConfig {
            initial_delay: Duration::from_millis(100),
            max_attempts: 4,
            max_delay: Duration::from_millis(400),
        },
        ..AnalysisConfig::default()
    };

    let err = ImageAnalysisRelay::new(oracle.clone(), config)
        .analyze("QmDogPhoto")
        .await
        .unwrap_err();

    assert_eq!(err, AnalysisError::Timeout { attempts: 4 });
    assert_eq!(oracle.polls(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_answer_missing_keys_rejected() {
    let oracle = Arc::new(ScriptedOracle::new(r#"{"isPhotoreal":true}"#, 0));

    let err = relay(oracle).analyze("QmDogPhoto").await.unwrap_err();
    assert!(matches!(err, AnalysisError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_empty_reference_rejected_before_oracle() {
    let oracle = Arc::new(ScriptedOracle::new(DOG, 0));

    let err = relay(oracle.clone()).analyze("  ").await.unwrap_err();
    assert_eq!(err, AnalysisError::MissingImage);
    assert!(oracle.submitted().is_empty());
}
