//! `WebAuthn` data types for Passkey Pilot
//!
//! Request/response shapes exchanged with the platform credential API and the
//! metadata records produced by the extractors. The records are what the
//! walkthrough UI renders; authData-derived fields use `Option` so a buffer
//! that could not be decoded shows up as "not available" instead of aborting
//! the ceremony.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-way user-verification classification from the authData flag bits
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum UserVerification {
    /// UV flag set: biometric or device PIN confirmed
    Verified,
    /// UP flag set without UV: tap/touch only
    PresenceOnly,
    /// Neither flag set
    None,
}

impl fmt::Display for UserVerification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserVerification::Verified => write!(f, "verified (biometric/PIN required)"),
            UserVerification::PresenceOnly => write!(f, "presence-only (no biometric check)"),
            UserVerification::None => write!(f, "none"),
        }
    }
}

/// Authenticator attachment as reported by the platform
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AuthenticatorAttachment {
    Platform,
    CrossPlatform,
    Unknown,
}

impl AuthenticatorAttachment {
    /// Classify the attachment string the platform reported, if any.
    #[must_use]
    pub fn from_report(report: Option<&str>) -> Self {
        match report {
            Some("platform") => AuthenticatorAttachment::Platform,
            Some("cross-platform") => AuthenticatorAttachment::CrossPlatform,
            _ => AuthenticatorAttachment::Unknown,
        }
    }
}

impl fmt::Display for AuthenticatorAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthenticatorAttachment::Platform => write!(f, "platform"),
            AuthenticatorAttachment::CrossPlatform => write!(f, "cross-platform"),
            AuthenticatorAttachment::Unknown => write!(f, "unknown"),
        }
    }
}

/// Parameters for a registration (create) call to the platform credential API
#[derive(Clone, Debug)]
pub struct RegistrationRequest {
    pub challenge: Vec<u8>,
    pub rp_id: String,
    pub rp_name: String,
    pub user_handle: Vec<u8>,
    pub user_name: String,
    /// Requested COSE algorithm identifier (-7 for ES256)
    pub algorithm: i64,
    pub authenticator_attachment: String, // "platform", "cross-platform"
    pub user_verification: String,        // "required", "preferred", "discouraged"
    pub timeout_ms: u32,
    pub attestation: String, // "none", "indirect", "direct"
}

/// Credential returned by a successful registration call
#[derive(Clone, Debug)]
pub struct RegisteredCredential {
    /// Base64url text form of the credential identifier
    pub id: String,
    pub raw_id: Vec<u8>,
    pub authenticator_attachment: Option<String>,
    /// CBOR-encoded attestation object (fmt, attStmt, authData)
    pub attestation_object: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub transports: Vec<String>,
}

/// Parameters for a verification (get) call to the platform credential API
#[derive(Clone, Debug)]
pub struct AssertionRequest {
    pub challenge: Vec<u8>,
    pub timeout_ms: u32,
    pub user_verification: String,
    /// Raw credential identifiers the platform may answer with
    pub allowed_credentials: Vec<Vec<u8>>,
}

/// Assertion returned by a successful verification call
#[derive(Clone, Debug)]
pub struct AssertionResult {
    pub id: String,
    pub raw_id: Vec<u8>,
    /// Raw authData buffer (no attested-credential block in assertions)
    pub authenticator_data: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub signature: Vec<u8>,
}

/// Decoded registration metadata, created once per successful ceremony
#[derive(Serialize, Clone, Debug)]
pub struct AttestationRecord {
    pub credential_id: Vec<u8>,
    pub attestation_format: String,
    pub authenticator_attachment: AuthenticatorAttachment,
    pub transports: Vec<String>,
    /// Hardware classification derived from the transport list
    pub hardware_type: String,
    /// Algorithm label, or `None` when no attested-credential block was present
    pub algorithm: Option<String>,
    pub user_verification: Option<UserVerification>,
    pub sign_count: Option<u32>,
    /// AAGUID formatted as a hyphenated UUID; all-zero is meaningful
    pub aaguid: Option<String>,
    pub backup_eligible: Option<bool>,
    pub backup_state: Option<bool>,
    pub rp_id_hash: Option<Vec<u8>>,
    /// Origin from clientDataJSON, empty when undecodable
    pub origin: String,
    pub created_at: DateTime<Utc>,
}

/// Decoded verification metadata
#[derive(Serialize, Clone, Debug)]
pub struct AssertionRecord {
    pub credential_id_matched: bool,
    pub sign_count: Option<u32>,
    pub user_verification: Option<UserVerification>,
    pub origin: String,
    pub signature_length: usize,
}
