//! # Image Analysis Relay
//!
//! Submits an image to the oracle, then polls for the assistant's answer
//! with a bounded, backed-off schedule.

use crate::domain::analysis::{parse_analysis, AnalysisResult};
use crate::domain::config::AnalysisConfig;
use crate::domain::errors::AnalysisError;
use crate::domain::prompt::{image_url, ANALYSIS_PROMPT};
use crate::ports::outbound::InferenceOracle;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Image analysis relay.
pub struct ImageAnalysisRelay {
    oracle: Arc<dyn InferenceOracle>,
    config: AnalysisConfig,
}

impl ImageAnalysisRelay {
    pub fn new(oracle: Arc<dyn InferenceOracle>, config: AnalysisConfig) -> Self {
        Self { oracle, config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze the content-addressed image `image_ref`.
    pub async fn analyze(&self, image_ref: &str) -> Result<AnalysisResult, AnalysisError> {
        let image_ref = image_ref.trim();
        if image_ref.is_empty() {
            return Err(AnalysisError::MissingImage);
        }

        let url = image_url(&self.config.ipfs_gateway, image_ref);
        info!(image_url = %url, "Submitting image for analysis");
        let chat_id = self.oracle.start_chat(ANALYSIS_PROMPT, &[url]).await?;

        let polling = &self.config.polling;
        sleep(polling.initial_delay).await;

        for attempt in 1..=polling.max_attempts {
            let history = self.oracle.message_history(chat_id).await?;
            if let Some(text) = history.last().and_then(|m| m.assistant_text()) {
                debug!(chat_id = %chat_id, attempt, "Oracle answered");
                let result = parse_analysis(text);
                if let Err(e) = &result {
                    warn!(chat_id = %chat_id, error = %e, "Oracle answer rejected");
                }
                return result;
            }

            if attempt < polling.max_attempts {
                let delay = polling.delay_after(attempt);
                debug!(chat_id = %chat_id, attempt, delay_ms = delay.as_millis() as u64, "No answer yet");
                sleep(delay).await;
            }
        }

        warn!(chat_id = %chat_id, attempts = polling.max_attempts, "Oracle did not answer");
        Err(AnalysisError::Timeout {
            attempts: polling.max_attempts,
        })
    }
}
