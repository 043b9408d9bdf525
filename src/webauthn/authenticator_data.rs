//! Authenticator-data parsing
//!
//! Decodes the packed `authData` layout:
//! rpIdHash[32] ‖ flags[1] ‖ signCount[4] ‖ attestedCredentialData
//! (aaguid[16] ‖ credIdLen[2] ‖ credId[credIdLen] ‖ COSE key), the attested
//! block being present only when the AT flag is set. All integers are
//! big-endian. Buffers shorter than the 37-byte fixed header parse to `None`
//! so callers can report "not available" instead of failing the ceremony;
//! non-conformant authenticators exist and their responses are still shown.

use uuid::Uuid;

use super::cursor::ByteCursor;
use super::types::UserVerification;

/// Flag bit 0: User Present (UP)
pub const FLAG_USER_PRESENT: u8 = 0x01;
/// Flag bit 2: User Verified (UV)
pub const FLAG_USER_VERIFIED: u8 = 0x04;
/// Flag bit 3: Backup Eligible (BE)
pub const FLAG_BACKUP_ELIGIBLE: u8 = 0x08;
/// Flag bit 4: Backup State (BS)
pub const FLAG_BACKUP_STATE: u8 = 0x10;
/// Flag bit 6: Attested Credential Data present (AT)
pub const FLAG_ATTESTED_CREDENTIAL_DATA: u8 = 0x40;

/// The attested-credential block present in registration responses.
#[derive(Debug, Clone)]
pub struct AttestedCredentialData {
    pub aaguid: [u8; 16],
    pub credential_id: Vec<u8>,
    /// Remaining bytes of the buffer, CBOR-encoded COSE key
    pub credential_public_key: Vec<u8>,
}

/// Structured view of a decoded `authData` buffer.
#[derive(Debug, Clone)]
pub struct AuthenticatorData {
    pub rp_id_hash: [u8; 32],
    pub flags: u8,
    pub sign_count: u32,
    pub attested_credential: Option<AttestedCredentialData>,
}

impl AuthenticatorData {
    #[must_use]
    pub fn user_present(&self) -> bool {
        self.flags & FLAG_USER_PRESENT != 0
    }

    #[must_use]
    pub fn user_verified(&self) -> bool {
        self.flags & FLAG_USER_VERIFIED != 0
    }

    #[must_use]
    pub fn backup_eligible(&self) -> bool {
        self.flags & FLAG_BACKUP_ELIGIBLE != 0
    }

    #[must_use]
    pub fn backup_state(&self) -> bool {
        self.flags & FLAG_BACKUP_STATE != 0
    }

    /// Three-way user-verification classification, a pure function of flag
    /// bits 0 and 2.
    #[must_use]
    pub fn user_verification(&self) -> UserVerification {
        if self.user_verified() {
            UserVerification::Verified
        } else if self.user_present() {
            UserVerification::PresenceOnly
        } else {
            UserVerification::None
        }
    }
}

/// Parse a raw `authData` buffer.
///
/// Returns `None` when the 37-byte fixed header is incomplete. A truncated
/// attested-credential block degrades to `attested_credential: None` rather
/// than discarding the fixed header fields.
#[must_use]
pub fn parse(bytes: &[u8]) -> Option<AuthenticatorData> {
    let mut cursor = ByteCursor::new(bytes);

    let rp_id_hash: [u8; 32] = cursor.read_bytes(32).ok()?.try_into().ok()?;
    let flags = cursor.read_byte().ok()?;
    let sign_count = cursor.read_u32_be().ok()?;

    let attested_credential = if flags & FLAG_ATTESTED_CREDENTIAL_DATA != 0 {
        parse_attested_credential(&mut cursor)
    } else {
        None
    };

    Some(AuthenticatorData {
        rp_id_hash,
        flags,
        sign_count,
        attested_credential,
    })
}

fn parse_attested_credential(cursor: &mut ByteCursor<'_>) -> Option<AttestedCredentialData> {
    let aaguid: [u8; 16] = cursor.read_bytes(16).ok()?.try_into().ok()?;
    let credential_id_length = cursor.read_u16_be().ok()? as usize;
    let credential_id = cursor.read_bytes(credential_id_length).ok()?.to_vec();
    // Everything left is the CBOR-encoded COSE public key
    let credential_public_key = cursor.rest().to_vec();

    Some(AttestedCredentialData {
        aaguid,
        credential_id,
        credential_public_key,
    })
}

/// Format a 16-byte AAGUID as a hyphenated UUID (8-4-4-4-12 hex groups).
///
/// The all-zero AAGUID is a meaningful value (privacy-preserving
/// authenticator) and formats like any other.
#[must_use]
pub fn format_aaguid(aaguid: &[u8; 16]) -> String {
    Uuid::from_bytes(*aaguid).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ciborium::value::Value;

    fn cose_key() -> Vec<u8> {
        let map = Value::Map(vec![
            (Value::Integer(1.into()), Value::Integer(2.into())),
            (Value::Integer(3.into()), Value::Integer((-7).into())),
        ]);
        let mut buf = Vec::new();
        ciborium::ser::into_writer(&map, &mut buf).unwrap();
        buf
    }

    fn auth_data(flags: u8, sign_count: u32) -> Vec<u8> {
        let mut data = vec![0xAB; 32];
        data.push(flags);
        data.extend_from_slice(&sign_count.to_be_bytes());
        data
    }

    fn auth_data_with_attested(flags: u8, aaguid: [u8; 16], cred_id: &[u8]) -> Vec<u8> {
        let mut data = auth_data(flags | FLAG_ATTESTED_CREDENTIAL_DATA, 1);
        data.extend_from_slice(&aaguid);
        data.extend_from_slice(&u16::try_from(cred_id.len()).unwrap().to_be_bytes());
        data.extend_from_slice(cred_id);
        data.extend_from_slice(&cose_key());
        data
    }

    #[test]
    fn test_sign_count_is_big_endian_regardless_of_flags() {
        for flags in [0x00u8, 0x01, 0x05, 0x1D, 0xFF & !FLAG_ATTESTED_CREDENTIAL_DATA] {
            let data = auth_data(flags, 0x0102_0304);
            let parsed = parse(&data).unwrap();
            assert_eq!(parsed.sign_count, 0x0102_0304, "flags {flags:#04x}");
        }
    }

    #[test]
    fn test_user_verification_three_way_classification() {
        // UV set wins over UP
        assert_eq!(
            parse(&auth_data(0x05, 0)).unwrap().user_verification(),
            UserVerification::Verified
        );
        // UV alone
        assert_eq!(
            parse(&auth_data(0x04, 0)).unwrap().user_verification(),
            UserVerification::Verified
        );
        // UP only
        assert_eq!(
            parse(&auth_data(0x01, 0)).unwrap().user_verification(),
            UserVerification::PresenceOnly
        );
        // Neither
        assert_eq!(
            parse(&auth_data(0x00, 0)).unwrap().user_verification(),
            UserVerification::None
        );
    }

    #[test]
    fn test_classification_ignores_unrelated_bits() {
        // BE, BS and reserved bits set, UP/UV clear
        assert_eq!(
            parse(&auth_data(0xFA & !FLAG_USER_VERIFIED & !FLAG_ATTESTED_CREDENTIAL_DATA, 0))
                .unwrap()
                .user_verification(),
            UserVerification::None
        );
        // Same with UP set
        assert_eq!(
            parse(&auth_data(0x1B & !FLAG_USER_VERIFIED, 0))
                .unwrap()
                .user_verification(),
            UserVerification::PresenceOnly
        );
    }

    #[test]
    fn test_backup_flags() {
        let parsed = parse(&auth_data(FLAG_BACKUP_ELIGIBLE | FLAG_BACKUP_STATE, 0)).unwrap();
        assert!(parsed.backup_eligible());
        assert!(parsed.backup_state());
        let parsed = parse(&auth_data(FLAG_BACKUP_ELIGIBLE, 0)).unwrap();
        assert!(parsed.backup_eligible());
        assert!(!parsed.backup_state());
    }

    #[test]
    fn test_short_buffer_is_not_available() {
        assert!(parse(&[0u8; 36]).is_none());
        assert!(parse(&[]).is_none());
    }

    #[test]
    fn test_minimum_buffer_parses() {
        let parsed = parse(&auth_data(0x01, 7)).unwrap();
        assert_eq!(parsed.rp_id_hash, [0xAB; 32]);
        assert_eq!(parsed.sign_count, 7);
        assert!(parsed.attested_credential.is_none());
    }

    #[test]
    fn test_attested_credential_block() {
        let aaguid = [0x11u8; 16];
        let cred_id = [0x77u8; 32];
        let data = auth_data_with_attested(0x05, aaguid, &cred_id);
        let parsed = parse(&data).unwrap();
        let attested = parsed.attested_credential.unwrap();
        assert_eq!(attested.aaguid, aaguid);
        assert_eq!(attested.credential_id, cred_id);
        assert_eq!(attested.credential_public_key, cose_key());
    }

    #[test]
    fn test_truncated_attested_block_keeps_header_fields() {
        let mut data = auth_data(0x05 | FLAG_ATTESTED_CREDENTIAL_DATA, 9);
        data.extend_from_slice(&[0u8; 10]); // partial aaguid
        let parsed = parse(&data).unwrap();
        assert_eq!(parsed.sign_count, 9);
        assert!(parsed.attested_credential.is_none());
    }

    #[test]
    fn test_credential_id_length_is_big_endian() {
        // Length 0x0120 = 288; a little-endian reading (0x2001) would overrun
        let mut data = auth_data(FLAG_ATTESTED_CREDENTIAL_DATA, 0);
        data.extend_from_slice(&[0u8; 16]);
        data.extend_from_slice(&[0x01, 0x20]);
        data.extend_from_slice(&vec![0x42u8; 288]);
        data.extend_from_slice(&cose_key());
        let attested = parse(&data).unwrap().attested_credential.unwrap();
        assert_eq!(attested.credential_id.len(), 288);
    }

    #[test]
    fn test_aaguid_formatting() {
        assert_eq!(
            format_aaguid(&[0u8; 16]),
            "00000000-0000-0000-0000-000000000000"
        );
        let aaguid: [u8; 16] = [
            0xfb, 0xfc, 0x30, 0x07, 0x15, 0x4e, 0x4e, 0xcc, 0x8c, 0x0b, 0x6e, 0x02, 0x05, 0x57,
            0xd7, 0xbd,
        ];
        assert_eq!(format_aaguid(&aaguid), "fbfc3007-154e-4ecc-8c0b-6e020557d7bd");
    }
}
