//! Analysis settings.

use super::prompt::DEFAULT_IPFS_GATEWAY;
use std::time::Duration;

/// Polling budget for the oracle's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollingConfig {
    /// Wait before the first poll.
    pub initial_delay: Duration,
    pub max_attempts: u32,
    /// Cap on the wait between polls.
    pub max_delay: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(2000),
            max_attempts: 8,
            max_delay: Duration::from_millis(8000),
        }
    }
}

impl PollingConfig {
    /// Wait after poll `attempt` (1-based): the initial delay doubled per
    /// attempt, capped at `max_delay`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1).min(16));
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Relay settings.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub ipfs_gateway: String,
    pub polling: PollingConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ipfs_gateway: DEFAULT_IPFS_GATEWAY.to_string(),
            polling: PollingConfig::default(),
        }
    }
}
