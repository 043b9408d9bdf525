//! Verification ceremony
//!
//! `Idle → Verifying → {Authenticated, Failed}`. The stored credential
//! reference gates the whole ceremony: with nothing stored, the machine fails
//! before the platform is ever asked for a prompt. On a returned assertion,
//! identifier equality against the stored reference decides the outcome;
//! metadata extraction runs only for the matching case.

use serde::Serialize;

use crate::utils::base64url_to_bytes;
use crate::webauthn::{
    extract_assertion_metadata, AssertionRecord, AssertionRequest, CeremonyError,
};

use super::platform::{PlatformAuthenticator, PlatformError};
use super::store::{CredentialStore, CREDENTIAL_STORAGE_KEY};
use super::{CeremonyEngine, DEMO_CHALLENGE};

/// Verification machine states
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationStatus {
    Idle,
    Verifying,
    Authenticated,
    Failed,
}

/// Observable state of the verification machine.
#[derive(Debug)]
pub struct VerificationState {
    status: VerificationStatus,
    credential_id_matched: Option<bool>,
    record: Option<AssertionRecord>,
    error: Option<CeremonyError>,
}

impl Default for VerificationState {
    fn default() -> Self {
        Self {
            status: VerificationStatus::Idle,
            credential_id_matched: None,
            record: None,
            error: None,
        }
    }
}

impl VerificationState {
    #[must_use]
    pub fn status(&self) -> VerificationStatus {
        self.status
    }

    /// Whether the returned identifier matched the stored reference.
    /// `None` until an assertion came back.
    #[must_use]
    pub fn credential_id_matched(&self) -> Option<bool> {
        self.credential_id_matched
    }

    /// Decoded assertion metadata after a successful ceremony
    #[must_use]
    pub fn record(&self) -> Option<&AssertionRecord> {
        self.record.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&CeremonyError> {
        self.error.as_ref()
    }

    /// User-facing failure message for the `Failed` state
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|error| match error {
            CeremonyError::UserCancelled => "Validation cancelled by user.".to_string(),
            other => other.to_string(),
        })
    }

    fn fail(&mut self, error: CeremonyError) {
        log::error!("Verification failed: {error}");
        self.status = VerificationStatus::Failed;
        self.error = Some(error);
    }
}

impl<P: PlatformAuthenticator, S: CredentialStore> CeremonyEngine<P, S> {
    /// Run the verification ceremony to completion.
    ///
    /// Returns the resulting machine status; the full outcome (record, match
    /// flag, error message) is available through
    /// [`CeremonyEngine::verification`].
    pub fn verify(&mut self) -> VerificationStatus {
        if self.ceremony_in_flight() {
            log::warn!("Verification ignored: a ceremony is already in flight");
            return self.verification.status;
        }

        // Re-verification is allowed; clear any previous outcome
        self.verification = VerificationState::default();

        if !self.platform.is_supported() {
            self.verification.fail(CeremonyError::EnvironmentUnsupported);
            return self.verification.status;
        }

        // The stored reference gates the prompt, not the other way around
        let Some(stored_id) = self.store.load(CREDENTIAL_STORAGE_KEY) else {
            self.verification.fail(CeremonyError::NoStoredCredential);
            return self.verification.status;
        };

        self.verification.status = VerificationStatus::Verifying;
        log::debug!("Verification entering verifying; awaiting the platform prompt");

        let allowed = match base64url_to_bytes(&stored_id) {
            Ok(raw) => vec![raw],
            Err(error) => {
                // A stored reference that does not decode cannot be offered
                // to the platform as an allowed credential
                log::warn!("Stored credential reference is not valid base64url: {error}");
                self.verification.fail(CeremonyError::NoStoredCredential);
                return self.verification.status;
            }
        };

        let request = AssertionRequest {
            challenge: DEMO_CHALLENGE.to_vec(),
            timeout_ms: self.settings.ceremony.timeout_ms,
            user_verification: self.settings.ceremony.user_verification.clone(),
            allowed_credentials: allowed,
        };

        match self.platform.get_assertion(&request) {
            Ok(assertion) => {
                if assertion.id.is_empty() {
                    self.verification.fail(CeremonyError::NoCredentialReturned);
                } else if assertion.id == stored_id {
                    let record = extract_assertion_metadata(&assertion, &stored_id);
                    log::info!(
                        "Passkey verified: counter {:?}, user verification {:?}",
                        record.sign_count,
                        record.user_verification
                    );
                    self.verification.credential_id_matched = Some(true);
                    self.verification.record = Some(record);
                    self.verification.status = VerificationStatus::Authenticated;
                } else {
                    // Mismatch short-circuits extraction; the assertion is
                    // for some other credential and its metadata is noise
                    self.verification.credential_id_matched = Some(false);
                    self.verification.fail(CeremonyError::CredentialMismatch);
                }
            }
            Err(PlatformError::Cancelled) => {
                self.verification.fail(CeremonyError::UserCancelled);
            }
            Err(PlatformError::Other(message)) => {
                self.verification.fail(CeremonyError::Platform(message));
            }
        }

        self.verification.status
    }
}
