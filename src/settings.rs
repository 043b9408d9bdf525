//! Simulator configuration
//!
//! Settings load in layered priority: defaults, then `Settings.toml` in the
//! current directory, then `PASSKEY_*` environment variables. The defaults
//! alone produce a working simulator, so the file and the variables are both
//! optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SimulatorSettings {
    pub relying_party: RelyingPartySettings,
    pub ceremony: CeremonySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelyingPartySettings {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CeremonySettings {
    pub timeout_ms: u32,
    /// COSE algorithm identifier requested at registration (-7 for ES256)
    pub algorithm: i64,
    pub user_verification: String,
    pub authenticator_attachment: String,
    pub attestation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for RelyingPartySettings {
    fn default() -> Self {
        Self {
            id: "localhost".to_string(),
            name: "Passkey Pilot".to_string(),
        }
    }
}

impl Default for CeremonySettings {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            algorithm: -7, // ES256
            user_verification: "required".to_string(),
            authenticator_attachment: "platform".to_string(),
            attestation: "direct".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl SimulatorSettings {
    /// Load settings from `Settings.toml` and environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but cannot be read or
    /// parsed.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = if Path::new("Settings.toml").exists() {
            Self::load_from_path(Path::new("Settings.toml"))?
        } else {
            Self::default()
        };
        Self::apply_env_overrides(&mut settings);
        Ok(settings)
    }

    /// Load base settings from a specific TOML file, without environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let toml_content = fs::read_to_string(path)?;
        let settings: Self = basic_toml::from_str(&toml_content)?;
        Ok(settings)
    }

    /// Initialize logging at the configured level. Safe to call more than
    /// once; later calls are no-ops.
    pub fn init_logging(&self) {
        let env = env_logger::Env::default().default_filter_or(&self.logging.level);
        let _ = env_logger::Builder::from_env(env).try_init();
    }

    fn apply_env_overrides(settings: &mut Self) {
        if let Ok(id) = std::env::var("PASSKEY_RP_ID") {
            settings.relying_party.id = id;
        }
        if let Ok(name) = std::env::var("PASSKEY_RP_NAME") {
            settings.relying_party.name = name;
        }
        if let Ok(timeout) = std::env::var("PASSKEY_TIMEOUT_MS") {
            if let Ok(timeout_ms) = timeout.parse::<u32>() {
                settings.ceremony.timeout_ms = timeout_ms;
            }
        }
        if let Ok(algorithm) = std::env::var("PASSKEY_ALGORITHM") {
            if let Ok(algorithm) = algorithm.parse::<i64>() {
                settings.ceremony.algorithm = algorithm;
            }
        }
        if let Ok(user_verification) = std::env::var("PASSKEY_USER_VERIFICATION") {
            settings.ceremony.user_verification = user_verification;
        }
        if let Ok(attachment) = std::env::var("PASSKEY_AUTHENTICATOR_ATTACHMENT") {
            settings.ceremony.authenticator_attachment = attachment;
        }
        if let Ok(attestation) = std::env::var("PASSKEY_ATTESTATION") {
            settings.ceremony.attestation = attestation;
        }
        if let Ok(level) = std::env::var("PASSKEY_LOG_LEVEL") {
            settings.logging.level = level;
        }
    }
}
