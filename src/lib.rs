#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Passkey Pilot: authenticator-ceremony simulator.
//!
//! The crate drives a browser-style passkey registration and verification
//! ceremony against a [`ceremony::platform::PlatformAuthenticator`] and decodes
//! the binary attestation/assertion responses (CBOR attestation object,
//! packed authenticator data, COSE public key) into human-readable records.
//! Signature verification is deliberately out of scope: the platform
//! authenticator is trusted to verify the user, and the decoder only reports
//! what was returned.

/// Version of the passkey-pilot crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod ceremony;
pub mod settings;
pub mod utils;
pub mod webauthn;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use ceremony::{CeremonyEngine, RegistrationStatus, VerificationStatus};
pub use settings::SimulatorSettings;
pub use webauthn::{AssertionRecord, AttestationRecord, UserVerification};
