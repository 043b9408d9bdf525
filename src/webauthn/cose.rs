//! COSE public-key handling
//!
//! The only field this system needs from a COSE key is the signing algorithm
//! (map key `3`, integer valued, e.g. -7 for ES256). Unknown identifiers are
//! reported, never rejected.

use super::cbor;
use super::errors::DecodeError;

/// COSE key map label for the algorithm entry
pub const COSE_KEY_ALG: i64 = 3;

/// ES256 algorithm identifier, the single algorithm this system requests
pub const ALG_ES256: i64 = -7;

/// Human-readable label for a COSE algorithm identifier.
#[must_use]
pub fn algorithm_label(alg: i64) -> String {
    match alg {
        -7 => "ES256 (-7)".to_string(),
        -8 => "EdDSA (-8)".to_string(),
        -35 => "ES384 (-35)".to_string(),
        -36 => "ES512 (-36)".to_string(),
        -37 => "PS256 (-37)".to_string(),
        -257 => "RS256 (-257)".to_string(),
        -258 => "RS384 (-258)".to_string(),
        -259 => "RS512 (-259)".to_string(),
        n => format!("Algorithm {n}"),
    }
}

/// Extract the algorithm identifier from a CBOR-encoded COSE key.
///
/// `bytes` may carry trailing data; only the first CBOR item is read.
///
/// # Errors
///
/// Returns `DecodeError` if the key is not decodable CBOR, is not a map, or
/// has no integer-valued algorithm entry.
pub fn algorithm_from_cose_key(bytes: &[u8]) -> Result<i64, DecodeError> {
    let item = cbor::decode_first_item(bytes)?;
    let entries =
        cbor::as_map(&item.value).ok_or(DecodeError::UnexpectedShape("COSE key is not a map"))?;
    let alg = cbor::map_integer_entry(entries, COSE_KEY_ALG)
        .ok_or(DecodeError::UnexpectedShape("COSE key has no algorithm entry"))?;
    cbor::integer_value(alg).ok_or(DecodeError::UnexpectedShape(
        "COSE algorithm entry is not an integer",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ciborium::value::Value;

    fn cose_key_with_alg(alg: i64) -> Vec<u8> {
        let map = Value::Map(vec![
            (Value::Integer(1.into()), Value::Integer(2.into())),
            (Value::Integer(3.into()), Value::Integer(alg.into())),
            (Value::Integer((-1).into()), Value::Integer(1.into())),
        ]);
        let mut buf = Vec::new();
        ciborium::ser::into_writer(&map, &mut buf).unwrap();
        buf
    }

    #[test]
    fn test_known_algorithm_labels() {
        assert_eq!(algorithm_label(-7), "ES256 (-7)");
        assert_eq!(algorithm_label(-257), "RS256 (-257)");
        assert_eq!(algorithm_label(-8), "EdDSA (-8)");
    }

    #[test]
    fn test_unknown_algorithm_label() {
        assert_eq!(algorithm_label(-999), "Algorithm -999");
        assert_eq!(algorithm_label(42), "Algorithm 42");
    }

    #[test]
    fn test_algorithm_extraction() {
        assert_eq!(algorithm_from_cose_key(&cose_key_with_alg(-7)).unwrap(), -7);
        assert_eq!(
            algorithm_from_cose_key(&cose_key_with_alg(-257)).unwrap(),
            -257
        );
        assert_eq!(
            algorithm_from_cose_key(&cose_key_with_alg(-999)).unwrap(),
            -999
        );
    }

    #[test]
    fn test_extraction_end_to_end_labels() {
        for (alg, label) in [(-7, "ES256 (-7)"), (-257, "RS256 (-257)"), (-999, "Algorithm -999")]
        {
            let parsed = algorithm_from_cose_key(&cose_key_with_alg(alg)).unwrap();
            assert_eq!(algorithm_label(parsed), label);
        }
    }

    #[test]
    fn test_non_map_is_rejected() {
        let mut buf = Vec::new();
        ciborium::ser::into_writer(&Value::Bytes(vec![1, 2, 3]), &mut buf).unwrap();
        assert!(matches!(
            algorithm_from_cose_key(&buf),
            Err(DecodeError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn test_missing_algorithm_entry() {
        let map = Value::Map(vec![(Value::Integer(1.into()), Value::Integer(2.into()))]);
        let mut buf = Vec::new();
        ciborium::ser::into_writer(&map, &mut buf).unwrap();
        assert!(matches!(
            algorithm_from_cose_key(&buf),
            Err(DecodeError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn test_truncated_key_is_malformed() {
        let full = cose_key_with_alg(-7);
        assert!(matches!(
            algorithm_from_cose_key(&full[..3]),
            Err(DecodeError::MalformedCbor(_))
        ));
    }
}
