//! Base64url codec for credential identifiers
//!
//! Credential identifiers cross the platform boundary as URL-safe unpadded
//! base64 text; the stored credential reference uses the same form, so both
//! directions live here.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::{DecodeError, Engine};

/// Encode raw bytes as URL-safe unpadded base64.
#[must_use]
pub fn bytes_to_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode URL-safe base64 text back into raw bytes.
///
/// # Errors
///
/// Returns a `DecodeError` if the text is not valid base64url.
pub fn base64url_to_bytes(text: &str) -> Result<Vec<u8>, DecodeError> {
    URL_SAFE_NO_PAD.decode(text)
}
