//! Stored credential reference persistence
//!
//! The single piece of durable state in the system: the base64url credential
//! identifier written after a successful registration and read back before
//! verification. The store is an explicit constructor dependency of the
//! ceremony engine so tests can run independent engines side by side.

use std::collections::HashMap;

/// Fixed key under which the demo credential reference is persisted
pub const CREDENTIAL_STORAGE_KEY: &str = "passkeyCredentialId";

/// Key/value persistence collaborator for the credential reference.
pub trait CredentialStore {
    /// Persist `value` under `key`, overwriting any previous value.
    fn store(&mut self, key: &str, value: &str);

    /// Read back the value stored under `key`, if any.
    fn load(&self, key: &str) -> Option<String>;

    /// Remove the value stored under `key`.
    fn remove(&mut self, key: &str);
}

/// In-memory store, the default backing for the simulator and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn store(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
