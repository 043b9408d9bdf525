//! Platform credential API boundary
//!
//! The browser's `navigator.credentials` becomes a trait here. The calls are
//! synchronous from this crate's perspective: control is handed to the
//! platform, the user interacts with the prompt (or dismisses it), and the
//! call resumes exactly once with a result or an error. The ceremony engine
//! never polls and owns no timeout beyond the value passed in the request.

use thiserror::Error;

use crate::webauthn::{AssertionRequest, AssertionResult, RegisteredCredential, RegistrationRequest};

/// Failures reported by the platform credential API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The user dismissed the prompt (NotAllowedError/AbortError analogue)
    #[error("the user cancelled the operation")]
    Cancelled,

    /// Any other platform failure; the message is surfaced verbatim
    #[error("{0}")]
    Other(String),
}

/// The platform credential API as the ceremony engine sees it.
pub trait PlatformAuthenticator {
    /// Probe for passkey capability. Checked before any ceremony leaves
    /// `Idle`; when false, no create/get call is ever attempted.
    fn is_supported(&self) -> bool;

    /// Run the registration prompt and mint a new credential.
    ///
    /// # Errors
    ///
    /// `PlatformError::Cancelled` when the user dismisses the prompt,
    /// `PlatformError::Other` for any other platform failure.
    fn create_credential(
        &mut self,
        request: &RegistrationRequest,
    ) -> Result<RegisteredCredential, PlatformError>;

    /// Run the verification prompt and produce an assertion.
    ///
    /// # Errors
    ///
    /// `PlatformError::Cancelled` when the user dismisses the prompt,
    /// `PlatformError::Other` for any other platform failure.
    fn get_assertion(
        &mut self,
        request: &AssertionRequest,
    ) -> Result<AssertionResult, PlatformError>;
}
