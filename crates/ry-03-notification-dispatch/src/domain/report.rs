//! Dispatch results.

use super::errors::DeliveryFailure;
use shared_types::Address;

/// Result for one subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(DeliveryFailure),
}

/// One stored member and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberDelivery {
    /// Address field of the member, as stored.
    pub address: String,
    pub outcome: DeliveryOutcome,
    /// Transport attempts made. Zero when the record or proof was rejected first
    /// or the peer cannot receive messages.
    pub attempts: u32,
}

impl SubscriberDelivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self.outcome, DeliveryOutcome::Delivered)
    }
}

/// Outcome of dispatching one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub label: String,
    /// Identity the notifications were sent from.
    pub sender: Address,
    /// Text sent to every subscriber.
    pub text: String,
    pub deliveries: Vec<SubscriberDelivery>,
}

impl DispatchReport {
    /// Summary returned to API callers.
    pub fn summary(&self) -> String {
        format!("Notifications sent for tag: {}", self.label)
    }

    pub fn delivered_count(&self) -> usize {
        self.deliveries.iter().filter(|d| d.is_delivered()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.deliveries.len() - self.delivered_count()
    }

    /// Failed transport attempts, including ones a retry recovered from.
    pub fn error_count(&self) -> u32 {
        self.deliveries
            .iter()
            .map(|d| match d.outcome {
                DeliveryOutcome::Delivered => d.attempts.saturating_sub(1),
                DeliveryOutcome::Failed(_) => d.attempts.max(1),
            })
            .sum()
    }
}
