//! `WebAuthn` assertion metadata extraction
//!
//! The verification-side counterpart of attestation extraction. Assertions
//! carry no attested-credential block, so only the 37-byte fixed header is
//! decoded: signature counter and the user-verification classification. The
//! signature itself is reported by length only; verifying it is the platform
//! authenticator's job, not this crate's.

use super::attestation::extract_origin;
use super::authenticator_data::{self, AuthenticatorData};
use super::types::{AssertionRecord, AssertionResult};

/// Extract display metadata from an assertion response.
///
/// `stored_credential_id` is the base64url text persisted at registration;
/// the comparison with the returned identifier is plain text equality.
#[must_use]
pub fn extract_assertion_metadata(
    assertion: &AssertionResult,
    stored_credential_id: &str,
) -> AssertionRecord {
    let auth_data = authenticator_data::parse(&assertion.authenticator_data);
    if auth_data.is_none() {
        log::warn!("Assertion authenticator data not available; reporting partial record");
    }

    AssertionRecord {
        credential_id_matched: assertion.id == stored_credential_id,
        sign_count: auth_data.as_ref().map(|d| d.sign_count),
        user_verification: auth_data.as_ref().map(AuthenticatorData::user_verification),
        origin: extract_origin(&assertion.client_data_json),
        signature_length: assertion.signature.len(),
    }
}
