//! Registration ceremony
//!
//! `Idle → Creating → {Success, Error}`. Success persists the credential
//! reference and runs attestation metadata extraction; cancellation is a
//! distinguished, retryable outcome with its own user-facing message. The
//! `Success` state is left only through `CeremonyEngine::reset`.

use serde::Serialize;

use crate::settings::SimulatorSettings;
use crate::webauthn::{
    extract_attestation_metadata, AttestationRecord, CeremonyError, RegistrationRequest,
};

use super::platform::{PlatformAuthenticator, PlatformError};
use super::store::{CredentialStore, CREDENTIAL_STORAGE_KEY};
use super::{CeremonyEngine, DEMO_CHALLENGE, DEMO_USER_HANDLE, DEMO_USER_NAME};

/// Registration machine states
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RegistrationStatus {
    Idle,
    Creating,
    Success,
    Error,
}

/// Observable state of the registration machine.
#[derive(Debug)]
pub struct RegistrationState {
    status: RegistrationStatus,
    credential_id: Option<String>,
    record: Option<AttestationRecord>,
    error: Option<CeremonyError>,
}

impl Default for RegistrationState {
    fn default() -> Self {
        Self {
            status: RegistrationStatus::Idle,
            credential_id: None,
            record: None,
            error: None,
        }
    }
}

impl RegistrationState {
    #[must_use]
    pub fn status(&self) -> RegistrationStatus {
        self.status
    }

    /// Base64url credential identifier after a successful ceremony
    #[must_use]
    pub fn credential_id(&self) -> Option<&str> {
        self.credential_id.as_deref()
    }

    /// Decoded attestation metadata after a successful ceremony
    #[must_use]
    pub fn record(&self) -> Option<&AttestationRecord> {
        self.record.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&CeremonyError> {
        self.error.as_ref()
    }

    /// User-facing failure message for the `Error` state
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|error| match error {
            CeremonyError::UserCancelled => {
                "Registration Cancelled - This is why Passkeys are secure; the user is always \
                 in control."
                    .to_string()
            }
            other => other.to_string(),
        })
    }

    fn fail(&mut self, error: CeremonyError) {
        log::error!("Registration failed: {error}");
        self.status = RegistrationStatus::Error;
        self.error = Some(error);
    }
}

/// Build the fixed-parameter registration call from settings.
fn registration_request(settings: &SimulatorSettings) -> RegistrationRequest {
    RegistrationRequest {
        challenge: DEMO_CHALLENGE.to_vec(),
        rp_id: settings.relying_party.id.clone(),
        rp_name: settings.relying_party.name.clone(),
        user_handle: DEMO_USER_HANDLE.to_vec(),
        user_name: DEMO_USER_NAME.to_string(),
        algorithm: settings.ceremony.algorithm,
        authenticator_attachment: settings.ceremony.authenticator_attachment.clone(),
        user_verification: settings.ceremony.user_verification.clone(),
        timeout_ms: settings.ceremony.timeout_ms,
        attestation: settings.ceremony.attestation.clone(),
    }
}

impl<P: PlatformAuthenticator, S: CredentialStore> CeremonyEngine<P, S> {
    /// Run the registration ceremony to completion.
    ///
    /// Returns the resulting machine status; the full outcome (record,
    /// error message) is available through [`CeremonyEngine::registration`].
    pub fn register(&mut self) -> RegistrationStatus {
        if self.ceremony_in_flight() {
            log::warn!("Registration ignored: a ceremony is already in flight");
            return self.registration.status;
        }
        if self.registration.status == RegistrationStatus::Success {
            log::warn!("Registration ignored: already registered, reset first");
            return self.registration.status;
        }

        // Reset a previous error before retrying
        self.registration = RegistrationState::default();

        if !self.platform.is_supported() {
            self.registration.fail(CeremonyError::EnvironmentUnsupported);
            return self.registration.status;
        }

        self.registration.status = RegistrationStatus::Creating;
        log::debug!("Registration entering creating; awaiting the platform prompt");

        let request = registration_request(&self.settings);
        match self.platform.create_credential(&request) {
            Ok(credential) => {
                if credential.id.is_empty() {
                    self.registration.fail(CeremonyError::NoCredentialReturned);
                } else {
                    // Persist first, then decode: the reference is the durable
                    // outcome, the record is advisory display data
                    self.store.store(CREDENTIAL_STORAGE_KEY, &credential.id);
                    let record = extract_attestation_metadata(&credential, &request);
                    log::info!(
                        "Passkey registered: {} via {}",
                        credential.id,
                        record.hardware_type
                    );
                    self.registration.credential_id = Some(credential.id);
                    self.registration.record = Some(record);
                    self.registration.status = RegistrationStatus::Success;
                }
            }
            Err(PlatformError::Cancelled) => {
                // Nothing was persisted; the store is untouched
                self.registration.fail(CeremonyError::UserCancelled);
            }
            Err(PlatformError::Other(message)) => {
                self.registration.fail(CeremonyError::Platform(message));
            }
        }

        self.registration.status
    }
}
