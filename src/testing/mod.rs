//! Testing utilities for Passkey Pilot
//!
//! Pre-built fixtures shared by the unit and integration tests: scripted
//! engines, settings, and hand-assembled `WebAuthn` buffers. Available to
//! external test targets through the `testing` cargo feature.

use crate::ceremony::{CeremonyEngine, MemoryStore, SimulatedAuthenticator};
use crate::settings::SimulatorSettings;

/// Central fixture provider for test data
pub struct TestFixtures;

impl TestFixtures {
    /// Default settings, unaffected by Settings.toml or the environment
    #[must_use]
    pub fn settings() -> SimulatorSettings {
        SimulatorSettings::default()
    }

    /// An engine over a platform-attached simulated authenticator and a
    /// fresh in-memory store
    #[must_use]
    pub fn engine() -> CeremonyEngine<SimulatedAuthenticator, MemoryStore> {
        CeremonyEngine::new(
            SimulatedAuthenticator::new(),
            MemoryStore::new(),
            Self::settings(),
        )
    }

    /// An engine whose platform reports no passkey capability
    #[must_use]
    pub fn unsupported_engine() -> CeremonyEngine<SimulatedAuthenticator, MemoryStore> {
        CeremonyEngine::new(
            SimulatedAuthenticator::unsupported(),
            MemoryStore::new(),
            Self::settings(),
        )
    }

    /// An engine over a cross-platform USB security key that skips user
    /// verification
    #[must_use]
    pub fn security_key_engine() -> CeremonyEngine<SimulatedAuthenticator, MemoryStore> {
        let platform = SimulatedAuthenticator::new()
            .with_transports(&["usb"])
            .with_attachment(Some("cross-platform"))
            .with_user_verified(false)
            .with_backup_flags(false, false);
        CeremonyEngine::new(platform, MemoryStore::new(), Self::settings())
    }
}
