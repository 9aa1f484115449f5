//! # RY-03 Notification Dispatch
//!
//! Notifies every subscriber of a tag that a new photo was posted.
//!
//! For a tag label the dispatcher resolves the notification text and the
//! sender identity, opens one messaging session as that sender, and then for
//! each stored subscription record rebuilds the consent proof from the stored
//! `(signature, timestamp)` pair, opens a channel to the subscriber with that
//! proof and sends the text. Sends are paced and strictly sequential.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - templates, sender registry, policy, reports and errors
//! - `ports/` - `MessagingTransport`, `MessagingSession`, `SubscriberDirectory`
//! - `adapters/` - HTTP relay transport, subscription-store directory
//! - `service.rs` - `NotificationDispatcher`
//! - `testing` - recording transport for tests

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;
pub mod testing;

pub use adapters::relay::{HttpRelayTransport, RelayConfig, SENDER_SIGNATURE_HEADER};
pub use domain::config::{DispatchConfig, RetryPolicy};
pub use domain::errors::{DeliveryFailure, DispatchError, TransportError};
pub use domain::report::{DeliveryOutcome, DispatchReport, SubscriberDelivery};
pub use domain::senders::TagSenderRegistry;
pub use domain::templates::{message_for, template};
pub use ports::outbound::{ChannelId, MessagingSession, MessagingTransport, SubscriberDirectory};
pub use service::NotificationDispatcher;
