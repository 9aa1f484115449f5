//! Dispatch policy.

use std::time::Duration;

/// What to do when the transport fails for one subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    /// Record the failure and move on.
    #[default]
    None,
    /// Wait, then open the channel and send once more.
    OnceAfter(Duration),
}

/// Dispatcher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Delay after every subscriber, delivered or not.
    pub pacing: Duration,
    /// Bound on each individual transport call.
    pub transport_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            pacing: Duration::from_millis(1000),
            transport_timeout: Duration::from_millis(15_000),
            retry: RetryPolicy::None,
        }
    }
}

impl DispatchConfig {
    /// No pacing, short timeouts.
    pub fn for_testing() -> Self {
        Self {
            pacing: Duration::ZERO,
            transport_timeout: Duration::from_millis(500),
            retry: RetryPolicy::None,
        }
    }
}
