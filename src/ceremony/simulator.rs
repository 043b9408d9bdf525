//! Simulated platform authenticator
//!
//! A scriptable [`PlatformAuthenticator`] that mints structurally real
//! `WebAuthn` buffers: CBOR attestation objects, packed authenticator data
//! with a big-endian counter, COSE public keys, and clientDataJSON. The
//! extractors decode these exactly like platform-produced ones, which is what
//! makes the demo binary and the integration tests honest.

use ciborium::value::Value;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::utils::bytes_to_base64url;
use crate::webauthn::{
    AssertionRequest, AssertionResult, RegisteredCredential, RegistrationRequest,
};

use super::platform::{PlatformAuthenticator, PlatformError};

const FLAG_USER_PRESENT: u8 = 0x01;
const FLAG_USER_VERIFIED: u8 = 0x04;
const FLAG_BACKUP_ELIGIBLE: u8 = 0x08;
const FLAG_BACKUP_STATE: u8 = 0x10;
const FLAG_ATTESTED_CREDENTIAL_DATA: u8 = 0x40;

/// Encode a COSE EC2 public key for the given algorithm identifier.
///
/// The coordinates are fixed filler bytes; the extractors only ever read the
/// algorithm entry (label `3`).
#[must_use]
pub fn encode_cose_key(algorithm: i64) -> Vec<u8> {
    let key = Value::Map(vec![
        (Value::Integer(1.into()), Value::Integer(2.into())),
        (Value::Integer(3.into()), Value::Integer(algorithm.into())),
        (Value::Integer((-1).into()), Value::Integer(1.into())),
        (Value::Integer((-2).into()), Value::Bytes(vec![0x11; 32])),
        (Value::Integer((-3).into()), Value::Bytes(vec![0x22; 32])),
    ]);
    let mut buffer = Vec::new();
    ciborium::ser::into_writer(&key, &mut buffer)
        .expect("CBOR serialization into a Vec is infallible");
    buffer
}

/// Assemble a packed authenticator-data buffer.
///
/// `attested` carries `(aaguid, credential_id, cose_public_key)`; when `None`
/// the result is the bare 37-byte header used in assertions.
#[must_use]
pub fn build_auth_data(
    rp_id: &str,
    flags: u8,
    sign_count: u32,
    attested: Option<(&[u8; 16], &[u8], &[u8])>,
) -> Vec<u8> {
    let mut data = Vec::with_capacity(37);
    data.extend_from_slice(&Sha256::digest(rp_id.as_bytes()));
    data.push(flags);
    data.extend_from_slice(&sign_count.to_be_bytes());
    if let Some((aaguid, credential_id, public_key)) = attested {
        data.extend_from_slice(aaguid);
        let id_len = u16::try_from(credential_id.len())
            .expect("simulated credential identifiers fit in u16");
        data.extend_from_slice(&id_len.to_be_bytes());
        data.extend_from_slice(credential_id);
        data.extend_from_slice(public_key);
    }
    data
}

/// Wrap authenticator data in a CBOR attestation object (`fmt`, `attStmt`,
/// `authData`).
#[must_use]
pub fn build_attestation_object(format: &str, auth_data: &[u8]) -> Vec<u8> {
    let object = Value::Map(vec![
        (
            Value::Text("fmt".to_string()),
            Value::Text(format.to_string()),
        ),
        (Value::Text("attStmt".to_string()), Value::Map(Vec::new())),
        (
            Value::Text("authData".to_string()),
            Value::Bytes(auth_data.to_vec()),
        ),
    ]);
    let mut buffer = Vec::new();
    ciborium::ser::into_writer(&object, &mut buffer)
        .expect("CBOR serialization into a Vec is infallible");
    buffer
}

/// Build the clientDataJSON payload for a ceremony.
#[must_use]
pub fn build_client_data_json(ceremony_type: &str, challenge: &[u8], origin: &str) -> Vec<u8> {
    serde_json::json!({
        "type": ceremony_type,
        "challenge": bytes_to_base64url(challenge),
        "origin": origin,
        "crossOrigin": false,
    })
    .to_string()
    .into_bytes()
}

/// Scriptable in-process stand-in for the platform credential API.
pub struct SimulatedAuthenticator {
    supported: bool,
    transports: Vec<String>,
    attachment: Option<String>,
    attestation_format: String,
    user_verified: bool,
    backup_eligible: bool,
    backup_state: bool,
    aaguid: [u8; 16],
    sign_count: u32,
    next_error: Option<PlatformError>,
    wrong_credential: bool,
    rp_id: String,
    credential: Option<(String, Vec<u8>)>,
    create_calls: usize,
    get_calls: usize,
}

impl Default for SimulatedAuthenticator {
    fn default() -> Self {
        Self {
            supported: true,
            transports: vec!["internal".to_string()],
            attachment: Some("platform".to_string()),
            attestation_format: "packed".to_string(),
            user_verified: true,
            backup_eligible: true,
            backup_state: true,
            aaguid: [0; 16],
            sign_count: 0,
            next_error: None,
            wrong_credential: false,
            rp_id: "localhost".to_string(),
            credential: None,
            create_calls: 0,
            get_calls: 0,
        }
    }
}

impl SimulatedAuthenticator {
    /// A platform-attached, user-verifying authenticator with a zero AAGUID
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An environment with no passkey capability at all
    #[must_use]
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_transports(mut self, transports: &[&str]) -> Self {
        self.transports = transports.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: Option<&str>) -> Self {
        self.attachment = attachment.map(ToString::to_string);
        self
    }

    #[must_use]
    pub fn with_user_verified(mut self, user_verified: bool) -> Self {
        self.user_verified = user_verified;
        self
    }

    #[must_use]
    pub fn with_backup_flags(mut self, eligible: bool, state: bool) -> Self {
        self.backup_eligible = eligible;
        self.backup_state = state;
        self
    }

    #[must_use]
    pub fn with_aaguid(mut self, aaguid: [u8; 16]) -> Self {
        self.aaguid = aaguid;
        self
    }

    /// Script the next platform call to report user cancellation.
    pub fn cancel_next(&mut self) {
        self.next_error = Some(PlatformError::Cancelled);
    }

    /// Script the next platform call to fail with the given message.
    pub fn fail_next(&mut self, message: &str) {
        self.next_error = Some(PlatformError::Other(message.to_string()));
    }

    /// Make the next assertion answer with a freshly minted identifier
    /// instead of the registered one.
    pub fn return_wrong_credential(&mut self) {
        self.wrong_credential = true;
    }

    /// Number of `create_credential` calls observed
    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.create_calls
    }

    /// Number of `get_assertion` calls observed
    #[must_use]
    pub fn get_calls(&self) -> usize {
        self.get_calls
    }

    fn flags(&self, attested: bool) -> u8 {
        let mut flags = FLAG_USER_PRESENT;
        if self.user_verified {
            flags |= FLAG_USER_VERIFIED;
        }
        if self.backup_eligible {
            flags |= FLAG_BACKUP_ELIGIBLE;
        }
        if self.backup_state {
            flags |= FLAG_BACKUP_STATE;
        }
        if attested {
            flags |= FLAG_ATTESTED_CREDENTIAL_DATA;
        }
        flags
    }

    fn mint_raw_id() -> Vec<u8> {
        let mut raw = vec![0u8; 32];
        rand::rng().fill_bytes(&mut raw);
        raw
    }
}

impl PlatformAuthenticator for SimulatedAuthenticator {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn create_credential(
        &mut self,
        request: &RegistrationRequest,
    ) -> Result<RegisteredCredential, PlatformError> {
        self.create_calls += 1;
        if let Some(error) = self.next_error.take() {
            return Err(error);
        }

        let raw_id = Self::mint_raw_id();
        let id = bytes_to_base64url(&raw_id);
        self.sign_count = 0;
        self.rp_id = request.rp_id.clone();
        self.credential = Some((id.clone(), raw_id.clone()));

        let public_key = encode_cose_key(request.algorithm);
        let auth_data = build_auth_data(
            &request.rp_id,
            self.flags(true),
            self.sign_count,
            Some((&self.aaguid, &raw_id, &public_key)),
        );

        Ok(RegisteredCredential {
            id,
            raw_id,
            authenticator_attachment: self.attachment.clone(),
            attestation_object: build_attestation_object(&self.attestation_format, &auth_data),
            client_data_json: build_client_data_json(
                "webauthn.create",
                &request.challenge,
                &format!("https://{}", request.rp_id),
            ),
            transports: self.transports.clone(),
        })
    }

    fn get_assertion(
        &mut self,
        request: &AssertionRequest,
    ) -> Result<AssertionResult, PlatformError> {
        self.get_calls += 1;
        if let Some(error) = self.next_error.take() {
            return Err(error);
        }

        let (id, raw_id) = if self.wrong_credential {
            self.wrong_credential = false;
            let raw = Self::mint_raw_id();
            (bytes_to_base64url(&raw), raw)
        } else {
            let Some(credential) = self.credential.clone() else {
                return Err(PlatformError::Other(
                    "No credential available on this authenticator.".to_string(),
                ));
            };
            credential
        };

        self.sign_count += 1;
        let auth_data = build_auth_data(&self.rp_id, self.flags(false), self.sign_count, None);

        let mut signature = vec![0u8; 64];
        rand::rng().fill_bytes(&mut signature);

        Ok(AssertionResult {
            id,
            raw_id,
            authenticator_data: auth_data,
            client_data_json: build_client_data_json(
                "webauthn.get",
                &request.challenge,
                &format!("https://{}", self.rp_id),
            ),
            signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webauthn::{authenticator_data, cbor};

    fn registration_request() -> RegistrationRequest {
        RegistrationRequest {
            challenge: vec![1, 2, 3, 4],
            rp_id: "localhost".to_string(),
            rp_name: "Passkey Pilot".to_string(),
            user_handle: b"passkey-demo-user".to_vec(),
            user_name: "Demo User".to_string(),
            algorithm: -7,
            authenticator_attachment: "platform".to_string(),
            user_verification: "required".to_string(),
            timeout_ms: 60_000,
            attestation: "direct".to_string(),
        }
    }

    #[test]
    fn test_minted_attestation_object_decodes() {
        let mut sim = SimulatedAuthenticator::new();
        let credential = sim.create_credential(&registration_request()).unwrap();

        let decoded = cbor::decode_first_item(&credential.attestation_object).unwrap();
        assert_eq!(decoded.consumed, credential.attestation_object.len());

        let map = cbor::as_map(&decoded.value).unwrap();
        assert!(cbor::map_text_entry(map, "authData").is_some());
    }

    #[test]
    fn test_minted_auth_data_round_trips_through_parser() {
        let mut sim = SimulatedAuthenticator::new().with_aaguid([0xAB; 16]);
        let credential = sim.create_credential(&registration_request()).unwrap();

        let decoded = cbor::decode_first_item(&credential.attestation_object).unwrap();
        let map = cbor::as_map(&decoded.value).unwrap();
        let auth_data_bytes = cbor::map_text_entry(map, "authData")
            .and_then(ciborium::value::Value::as_bytes)
            .unwrap();

        let parsed = authenticator_data::parse(auth_data_bytes).unwrap();
        assert!(parsed.user_present());
        assert!(parsed.user_verified());
        assert_eq!(parsed.sign_count, 0);
        let attested = parsed.attested_credential.unwrap();
        assert_eq!(attested.aaguid, [0xAB; 16]);
        assert_eq!(attested.credential_id, credential.raw_id);
    }

    #[test]
    fn test_assertion_counter_increments() {
        let mut sim = SimulatedAuthenticator::new();
        let credential = sim.create_credential(&registration_request()).unwrap();

        let request = AssertionRequest {
            challenge: vec![1, 2, 3, 4],
            timeout_ms: 60_000,
            user_verification: "required".to_string(),
            allowed_credentials: vec![credential.raw_id.clone()],
        };

        let first = sim.get_assertion(&request).unwrap();
        let second = sim.get_assertion(&request).unwrap();
        assert_eq!(first.id, credential.id);

        let first_count = authenticator_data::parse(&first.authenticator_data)
            .unwrap()
            .sign_count;
        let second_count = authenticator_data::parse(&second.authenticator_data)
            .unwrap()
            .sign_count;
        assert_eq!(first_count, 1);
        assert_eq!(second_count, 2);
    }

    #[test]
    fn test_scripted_cancellation_applies_once() {
        let mut sim = SimulatedAuthenticator::new();
        sim.cancel_next();
        assert!(matches!(
            sim.create_credential(&registration_request()),
            Err(PlatformError::Cancelled)
        ));
        assert!(sim.create_credential(&registration_request()).is_ok());
    }
}
