//! Ceremony state machines
//!
//! Two independent machines, registration (`Idle → Creating →
//! {Success, Error}`) and verification (`Idle → Verifying → {Authenticated,
//! Failed}`), coordinated by one [`CeremonyEngine`] that owns the platform
//! authenticator and the credential store as explicit dependencies. The only
//! state shared between the two machines is the persisted credential
//! reference; only one ceremony runs at a time.

pub mod platform;
mod registration;
pub mod simulator;
pub mod store;
mod verification;

pub use platform::{PlatformAuthenticator, PlatformError};
pub use registration::{RegistrationState, RegistrationStatus};
pub use simulator::SimulatedAuthenticator;
pub use store::{CredentialStore, MemoryStore, CREDENTIAL_STORAGE_KEY};
pub use verification::{VerificationState, VerificationStatus};

use crate::settings::SimulatorSettings;

/// Fixed demo challenge bytes used by both ceremonies
pub const DEMO_CHALLENGE: [u8; 16] = [
    0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
    0x10,
];

/// Fixed demo user handle
pub const DEMO_USER_HANDLE: &[u8] = b"passkey-demo-user";

/// Fixed demo user display name
pub const DEMO_USER_NAME: &str = "Demo User";

/// Driver for the registration and verification ceremonies.
pub struct CeremonyEngine<P, S> {
    pub(crate) platform: P,
    pub(crate) store: S,
    pub(crate) settings: SimulatorSettings,
    pub(crate) registration: RegistrationState,
    pub(crate) verification: VerificationState,
}

impl<P: PlatformAuthenticator, S: CredentialStore> CeremonyEngine<P, S> {
    /// Create an engine over the given platform and store.
    pub fn new(platform: P, store: S, settings: SimulatorSettings) -> Self {
        Self {
            platform,
            store,
            settings,
            registration: RegistrationState::default(),
            verification: VerificationState::default(),
        }
    }

    /// Current registration machine state
    #[must_use]
    pub fn registration(&self) -> &RegistrationState {
        &self.registration
    }

    /// Current verification machine state
    #[must_use]
    pub fn verification(&self) -> &VerificationState {
        &self.verification
    }

    /// The persisted credential reference, if a registration succeeded
    #[must_use]
    pub fn stored_credential(&self) -> Option<String> {
        self.store.load(CREDENTIAL_STORAGE_KEY)
    }

    /// Mutable access to the platform collaborator (used to script the
    /// simulated authenticator)
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Clear both machines and the persisted credential reference.
    ///
    /// This is the only way to leave the registration `Success` state.
    pub fn reset(&mut self) {
        log::debug!("Resetting both ceremonies and the stored credential reference");
        self.registration = RegistrationState::default();
        self.verification = VerificationState::default();
        self.store.remove(CREDENTIAL_STORAGE_KEY);
    }

    /// True while either machine is waiting on the platform prompt.
    pub(crate) fn ceremony_in_flight(&self) -> bool {
        self.registration.status() == RegistrationStatus::Creating
            || self.verification.status() == VerificationStatus::Verifying
    }
}
