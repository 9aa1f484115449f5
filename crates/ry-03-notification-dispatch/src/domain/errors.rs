//! # Dispatch Errors

use ry_01_consent_codec::ConsentError;
use ry_02_subscription_store::StoreError;
use shared_types::RecordError;
use std::time::Duration;
use thiserror::Error;

/// Messaging transport failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Could not establish a session for the sender.
    #[error("Failed to connect to messaging transport: {0}")]
    Connect(String),

    /// Request could not be sent or its response not read.
    #[error("Transport request failed: {0}")]
    Http(String),

    /// Transport refused the request (for example an unacceptable consent proof).
    #[error("Transport rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Response did not have the expected shape.
    #[error("Invalid transport response: {0}")]
    InvalidResponse(String),

    /// Call did not finish within the per-call timeout.
    #[error("Transport call timed out after {0:?}")]
    Timeout(Duration),

    /// Session was used after it was closed.
    #[error("Messaging session is closed")]
    SessionClosed,
}

/// Why one subscriber was not notified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryFailure {
    #[error("unreadable subscription record: {0}")]
    InvalidRecord(#[from] RecordError),

    #[error("cannot build consent proof: {0}")]
    InvalidProof(#[from] ConsentError),

    #[error("peer cannot receive messages")]
    Unreachable,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failure that aborts a whole dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Subscribers could not be read.
    #[error("Failed to load subscribers for {label}: {source}")]
    Directory {
        label: String,
        #[source]
        source: StoreError,
    },

    /// No session could be opened for the sender.
    #[error("Failed to open messaging session: {0}")]
    Session(TransportError),
}
