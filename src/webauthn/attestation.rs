//! `WebAuthn` attestation metadata extraction
//!
//! Decodes the CBOR attestation object returned at registration and derives
//! the human-readable record the walkthrough displays. Every sub-step that
//! can fail is isolated: a bad COSE key, an undecodable clientDataJSON, or a
//! short authData buffer each degrade their own fields and never suppress the
//! rest. No signature is verified here; the record reports what the
//! authenticator returned, it does not prove trust.

use chrono::Utc;

use super::authenticator_data::{self, AuthenticatorData};
use super::cbor;
use super::cose;
use super::errors::DecodeError;
use super::types::{
    AttestationRecord, AuthenticatorAttachment, RegisteredCredential, RegistrationRequest,
};

/// Ordered transport → hardware-type table; single-transport lookups walk it
/// in order, more than one transport classifies as multi-transport.
const TRANSPORT_LABELS: &[(&str, &str)] = &[
    ("internal", "Platform Biometrics"),
    ("usb", "USB Security Key"),
    ("nfc", "NFC Security Key"),
    ("ble", "Bluetooth Security Key"),
    ("hybrid", "Hybrid Authenticator"),
];

/// Top-level fields of a decoded attestation object
struct AttestationObject {
    format: String,
    auth_data: Option<Vec<u8>>,
}

/// Extract display metadata from a registration response.
///
/// Infallible: decode failures downgrade individual fields to their
/// "not available" form and are logged. Attestation parsing here is
/// advisory, not security-critical.
#[must_use]
pub fn extract_attestation_metadata(
    credential: &RegisteredCredential,
    request: &RegistrationRequest,
) -> AttestationRecord {
    let object = match decode_attestation_object(&credential.attestation_object) {
        Ok(object) => object,
        Err(e) => {
            log::warn!("Attestation object could not be decoded: {e}");
            AttestationObject {
                format: "unknown".to_string(),
                auth_data: None,
            }
        }
    };

    let auth_data = object
        .auth_data
        .as_deref()
        .and_then(authenticator_data::parse);
    if auth_data.is_none() {
        log::warn!("Authenticator data not available; reporting partial record");
    }

    AttestationRecord {
        credential_id: credential.raw_id.clone(),
        attestation_format: object.format,
        authenticator_attachment: AuthenticatorAttachment::from_report(
            credential.authenticator_attachment.as_deref(),
        ),
        transports: credential.transports.clone(),
        hardware_type: classify_hardware(&credential.transports).to_string(),
        algorithm: auth_data.as_ref().and_then(|d| derive_algorithm(d, request)),
        user_verification: auth_data.as_ref().map(AuthenticatorData::user_verification),
        sign_count: auth_data.as_ref().map(|d| d.sign_count),
        aaguid: auth_data.as_ref().and_then(|d| {
            d.attested_credential
                .as_ref()
                .map(|att| authenticator_data::format_aaguid(&att.aaguid))
        }),
        backup_eligible: auth_data.as_ref().map(AuthenticatorData::backup_eligible),
        backup_state: auth_data.as_ref().map(AuthenticatorData::backup_state),
        rp_id_hash: auth_data.as_ref().map(|d| d.rp_id_hash.to_vec()),
        origin: extract_origin(&credential.client_data_json),
        created_at: Utc::now(),
    }
}

/// Decode the top-level attestation object map (`fmt`, `attStmt`, `authData`).
fn decode_attestation_object(bytes: &[u8]) -> Result<AttestationObject, DecodeError> {
    let item = cbor::decode_first_item(bytes)?;
    let entries = cbor::as_map(&item.value)
        .ok_or(DecodeError::UnexpectedShape("attestation object is not a map"))?;

    // A missing fmt is tolerated; a missing authData leaves all derived
    // fields "not available"
    let format = cbor::map_text_entry(entries, "fmt")
        .and_then(ciborium::value::Value::as_text)
        .unwrap_or("unknown")
        .to_string();
    let auth_data = cbor::map_text_entry(entries, "authData")
        .and_then(ciborium::value::Value::as_bytes)
        .cloned();

    Ok(AttestationObject { format, auth_data })
}

/// Derive the algorithm label from the attested COSE key.
///
/// When the COSE key is truncated or malformed the label falls back to the
/// algorithm that was requested at registration: the authenticator is
/// contractually bound to honor the single requested algorithm here, so the
/// assumption is recorded rather than "unknown". This conflates "undecodable"
/// with "as requested"; the warn log keeps the imprecision visible.
fn derive_algorithm(auth_data: &AuthenticatorData, request: &RegistrationRequest) -> Option<String> {
    let attested = auth_data.attested_credential.as_ref()?;
    match cose::algorithm_from_cose_key(&attested.credential_public_key) {
        Ok(alg) => Some(cose::algorithm_label(alg)),
        Err(e) => {
            log::warn!(
                "COSE key undecodable ({e}); assuming requested algorithm {}",
                request.algorithm
            );
            Some(cose::algorithm_label(request.algorithm))
        }
    }
}

/// Classify hardware type from the reported transport list.
fn classify_hardware(transports: &[String]) -> &'static str {
    match transports {
        [] => "Unknown",
        [single] => TRANSPORT_LABELS
            .iter()
            .find_map(|(transport, label)| (transport == single).then_some(*label))
            .unwrap_or("Unknown"),
        _ => "Multi-Transport Authenticator",
    }
}

/// Extract the `origin` field from a clientDataJSON buffer.
///
/// Tolerates undecodable input by returning an empty string so the rest of
/// the record still renders.
pub(crate) fn extract_origin(client_data_json: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(client_data_json)
        .ok()
        .and_then(|data| {
            data.get("origin")
                .and_then(|origin| origin.as_str().map(ToString::to_string))
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::super::types::UserVerification;
    use super::*;
    use ciborium::value::Value;

    fn encode(value: &Value) -> Vec<u8> {
        let mut buf = Vec::new();
        ciborium::ser::into_writer(value, &mut buf).unwrap();
        buf
    }

    fn cose_key(alg: i64) -> Vec<u8> {
        encode(&Value::Map(vec![
            (Value::Integer(1.into()), Value::Integer(2.into())),
            (Value::Integer(3.into()), Value::Integer(alg.into())),
        ]))
    }

    fn auth_data(flags: u8, attested: Option<(&[u8; 16], &[u8], &[u8])>) -> Vec<u8> {
        let mut data = vec![0xCD; 32];
        data.push(flags);
        data.extend_from_slice(&5u32.to_be_bytes());
        if let Some((aaguid, cred_id, key)) = attested {
            data.extend_from_slice(aaguid);
            data.extend_from_slice(&u16::try_from(cred_id.len()).unwrap().to_be_bytes());
            data.extend_from_slice(cred_id);
            data.extend_from_slice(key);
        }
        data
    }

    fn attestation_object(fmt: Option<&str>, auth_data: &[u8]) -> Vec<u8> {
        let mut entries = Vec::new();
        if let Some(fmt) = fmt {
            entries.push((Value::Text("fmt".into()), Value::Text(fmt.into())));
        }
        entries.push((Value::Text("attStmt".into()), Value::Map(Vec::new())));
        entries.push((
            Value::Text("authData".into()),
            Value::Bytes(auth_data.to_vec()),
        ));
        encode(&Value::Map(entries))
    }

    fn request() -> RegistrationRequest {
        RegistrationRequest {
            challenge: vec![1; 16],
            rp_id: "localhost".to_string(),
            rp_name: "Passkey Pilot".to_string(),
            user_handle: b"passkey-demo-user".to_vec(),
            user_name: "Demo User".to_string(),
            algorithm: -7,
            authenticator_attachment: "platform".to_string(),
            user_verification: "required".to_string(),
            timeout_ms: 60000,
            attestation: "direct".to_string(),
        }
    }

    fn credential(attestation_object: Vec<u8>, transports: &[&str]) -> RegisteredCredential {
        RegisteredCredential {
            id: "AQIDBA".to_string(),
            raw_id: vec![1, 2, 3, 4],
            authenticator_attachment: Some("platform".to_string()),
            attestation_object,
            client_data_json:
                br#"{"type":"webauthn.create","challenge":"AQID","origin":"https://localhost"}"#
                    .to_vec(),
            transports: transports.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_full_record() {
        let aaguid = [0u8; 16];
        let cred_id = [9u8; 16];
        let key = cose_key(-7);
        // UP+UV+AT
        let data = auth_data(0x45, Some((&aaguid, &cred_id, &key)));
        let record = extract_attestation_metadata(
            &credential(attestation_object(Some("packed"), &data), &["internal"]),
            &request(),
        );

        assert_eq!(record.attestation_format, "packed");
        assert_eq!(record.hardware_type, "Platform Biometrics");
        assert_eq!(record.algorithm.as_deref(), Some("ES256 (-7)"));
        assert_eq!(record.user_verification, Some(UserVerification::Verified));
        assert_eq!(record.sign_count, Some(5));
        assert_eq!(
            record.aaguid.as_deref(),
            Some("00000000-0000-0000-0000-000000000000")
        );
        assert_eq!(record.backup_eligible, Some(false));
        assert_eq!(record.origin, "https://localhost");
        assert_eq!(
            record.authenticator_attachment,
            AuthenticatorAttachment::Platform
        );
    }

    #[test]
    fn test_missing_fmt_defaults_to_unknown() {
        let data = auth_data(0x05, None);
        let record = extract_attestation_metadata(
            &credential(attestation_object(None, &data), &["usb"]),
            &request(),
        );
        assert_eq!(record.attestation_format, "unknown");
        assert_eq!(record.hardware_type, "USB Security Key");
    }

    #[test]
    fn test_garbage_attestation_object_still_reports() {
        let record = extract_attestation_metadata(
            &credential(vec![0xFF, 0x00, 0x01], &["internal"]),
            &request(),
        );
        assert_eq!(record.attestation_format, "unknown");
        assert!(record.sign_count.is_none());
        assert!(record.algorithm.is_none());
        // Fields not derived from the attestation object survive
        assert_eq!(record.hardware_type, "Platform Biometrics");
        assert_eq!(record.origin, "https://localhost");
    }

    #[test]
    fn test_malformed_cose_key_falls_back_to_requested_algorithm() {
        let aaguid = [3u8; 16];
        let cred_id = [9u8; 8];
        let truncated_key = &cose_key(-7)[..2];
        let data = auth_data(0x45, Some((&aaguid, &cred_id, truncated_key)));
        let record = extract_attestation_metadata(
            &credential(attestation_object(Some("packed"), &data), &["internal"]),
            &request(),
        );
        assert_eq!(record.algorithm.as_deref(), Some("ES256 (-7)"));
    }

    #[test]
    fn test_unknown_cose_algorithm_is_labelled() {
        let aaguid = [3u8; 16];
        let cred_id = [9u8; 8];
        let key = cose_key(-999);
        let data = auth_data(0x45, Some((&aaguid, &cred_id, &key)));
        let record = extract_attestation_metadata(
            &credential(attestation_object(Some("packed"), &data), &["internal"]),
            &request(),
        );
        assert_eq!(record.algorithm.as_deref(), Some("Algorithm -999"));
    }

    #[test]
    fn test_hardware_classification_table() {
        let single = |t: &str| classify_hardware(&[t.to_string()]);
        assert_eq!(single("internal"), "Platform Biometrics");
        assert_eq!(single("usb"), "USB Security Key");
        assert_eq!(single("nfc"), "NFC Security Key");
        assert_eq!(single("ble"), "Bluetooth Security Key");
        assert_eq!(single("hybrid"), "Hybrid Authenticator");
        assert_eq!(single("smart-card"), "Unknown");
        assert_eq!(classify_hardware(&[]), "Unknown");
        assert_eq!(
            classify_hardware(&["usb".to_string(), "nfc".to_string()]),
            "Multi-Transport Authenticator"
        );
    }

    #[test]
    fn test_undecodable_client_data_leaves_origin_empty() {
        let data = auth_data(0x05, None);
        let mut cred = credential(attestation_object(Some("none"), &data), &["internal"]);
        cred.client_data_json = vec![0xFF, 0xFE];
        let record = extract_attestation_metadata(&cred, &request());
        assert_eq!(record.origin, "");
        assert_eq!(record.sign_count, Some(5));
    }

    #[test]
    fn test_extract_origin_missing_field() {
        assert_eq!(extract_origin(br#"{"type":"webauthn.create"}"#), "");
        assert_eq!(extract_origin(b"not json"), "");
    }
}
