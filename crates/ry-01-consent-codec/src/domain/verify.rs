//! Consent signature verification.

use super::errors::ConsentError;
use super::message::build_consent_message;
use shared_crypto::{recover_message_signer, RecoverableSignature};
use shared_types::Address;

/// Check that `signature` is the subscriber's `personal_sign` signature over
/// the consent message for `sender_address` at `timestamp_ms`.
///
/// `sender_address` is rendered into the message exactly as given, so callers
/// must pass the same form the subscriber's wallet displayed.
pub fn verify_consent(
    subscriber_address: &str,
    sender_address: &str,
    signature: &str,
    timestamp_ms: u64,
) -> Result<(), ConsentError> {
    let expected = Address::from_hex(subscriber_address)
        .map_err(|e| ConsentError::InvalidAddress(e.to_string()))?;
    let signature = RecoverableSignature::from_hex(signature)?;
    let message = build_consent_message(sender_address, timestamp_ms)?;

    let actual = recover_message_signer(message.as_bytes(), &signature)?;
    if actual != expected {
        return Err(ConsentError::SignerMismatch {
            expected: expected.to_checksum(),
            actual: actual.to_checksum(),
        });
    }
    Ok(())
}
