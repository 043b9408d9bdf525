//! Error types for ceremony and decode operations
//!
//! Two separate taxonomies on purpose: [`DecodeError`] covers the binary
//! decode layer and is fully absorbed inside the metadata extractors
//! (attestation parsing is advisory, so a bad buffer downgrades fields to
//! "not available" instead of failing the ceremony), while [`CeremonyError`]
//! covers the failures that surface as a ceremony's terminal error state.

use thiserror::Error;

/// Failures while decoding authenticator-produced byte buffers.
///
/// These never propagate past the extractor boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A read past the end of the buffer was attempted
    #[error("out of range: needed {needed} bytes, {remaining} remaining")]
    OutOfRange { needed: usize, remaining: usize },

    /// Truncated or structurally invalid CBOR
    #[error("malformed CBOR: {0}")]
    MalformedCbor(String),

    /// Structurally valid CBOR of an unexpected shape
    #[error("unexpected CBOR shape: {0}")]
    UnexpectedShape(&'static str),
}

/// Failures that terminate a ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CeremonyError {
    /// The platform lacks passkey capability; not retryable in this environment
    #[error("Passkeys are not supported in this environment. Please use a platform that supports passkeys.")]
    EnvironmentUnsupported,

    /// The user dismissed the platform prompt. An intended, secure outcome.
    #[error("The operation was cancelled by the user.")]
    UserCancelled,

    /// Verification attempted with nothing registered
    #[error("No passkey found. Please register a passkey first.")]
    NoStoredCredential,

    /// The returned credential identifier does not match the stored one
    #[error("Credential ID mismatch. Validation failed.")]
    CredentialMismatch,

    /// The platform returned a credential without an identifier
    #[error("No credential returned. Validation failed.")]
    NoCredentialReturned,

    /// Any other platform-reported failure, message surfaced verbatim
    #[error("{0}")]
    Platform(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_messages() {
        let err = DecodeError::OutOfRange {
            needed: 4,
            remaining: 2,
        };
        assert_eq!(err.to_string(), "out of range: needed 4 bytes, 2 remaining");

        let err = DecodeError::MalformedCbor("truncated".to_string());
        assert_eq!(err.to_string(), "malformed CBOR: truncated");
    }

    #[test]
    fn test_ceremony_error_messages() {
        assert_eq!(
            CeremonyError::NoStoredCredential.to_string(),
            "No passkey found. Please register a passkey first."
        );
        assert_eq!(
            CeremonyError::CredentialMismatch.to_string(),
            "Credential ID mismatch. Validation failed."
        );
        assert_eq!(
            CeremonyError::Platform("boom".to_string()).to_string(),
            "boom"
        );
    }
}
