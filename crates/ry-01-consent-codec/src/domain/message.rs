//! Consent message text.

use super::errors::ConsentError;
use chrono::DateTime;

const CONSENT_HEADER: &str = "XMTP : Grant inbox consent to sender";
const CONSENT_INFO_URL: &str = "https://xmtp.org/signatures/";

/// Latest renderable timestamp: 9999-12-31T23:59:59.999Z.
pub const MAX_TIMESTAMP_MS: u64 = 253_402_300_799_999;

/// Render a millisecond timestamp as an RFC 7231 date, e.g.
/// `Tue, 14 Nov 2023 22:13:20 GMT`. Milliseconds are truncated.
pub fn format_utc_timestamp(timestamp_ms: u64) -> Result<String, ConsentError> {
    if timestamp_ms > MAX_TIMESTAMP_MS {
        return Err(ConsentError::TimestampOutOfRange(timestamp_ms));
    }
    let millis =
        i64::try_from(timestamp_ms).map_err(|_| ConsentError::TimestampOutOfRange(timestamp_ms))?;
    let datetime = DateTime::from_timestamp_millis(millis)
        .ok_or(ConsentError::TimestampOutOfRange(timestamp_ms))?;

    Ok(datetime.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
}

/// The text a subscriber signs to let `sender_address` message them.
pub fn build_consent_message(
    sender_address: &str,
    timestamp_ms: u64,
) -> Result<String, ConsentError> {
    let current_time = format_utc_timestamp(timestamp_ms)?;

    Ok(format!(
        "{CONSENT_HEADER}\n\nCurrent Time: {current_time}\nFrom Address: {sender_address}\n\nFor more info: {CONSENT_INFO_URL}"
    ))
}
