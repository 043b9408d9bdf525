//! CBOR processing for `WebAuthn`
//!
//! Decoding here is deliberately item-exact: inside the attested-credential
//! block the credential id and the COSE public key sit back-to-back with no
//! outer envelope, so a decode must report how many bytes the first item
//! occupied and the next decode must start exactly at that boundary.

use ciborium::de::from_reader;
use ciborium::value::Value;

use super::errors::DecodeError;

/// One decoded CBOR item plus the exact number of input bytes it occupied.
#[derive(Debug)]
pub struct DecodedItem {
    pub value: Value,
    pub consumed: usize,
}

/// Decode a single CBOR data item from the front of `bytes`.
///
/// Trailing bytes after the first item are left untouched; `consumed` tells
/// the caller where the next independent item starts.
///
/// # Errors
///
/// Returns `DecodeError::MalformedCbor` on truncated or structurally invalid
/// input.
pub fn decode_first_item(bytes: &[u8]) -> Result<DecodedItem, DecodeError> {
    // from_reader pulls exactly the bytes the item needs; the slice reader
    // advances past them, so the length difference is the item's size.
    let mut remaining: &[u8] = bytes;
    let value: Value =
        from_reader(&mut remaining).map_err(|e| DecodeError::MalformedCbor(e.to_string()))?;
    Ok(DecodedItem {
        value,
        consumed: bytes.len() - remaining.len(),
    })
}

/// View a value as a CBOR map's entry list.
#[must_use]
pub fn as_map(value: &Value) -> Option<&[(Value, Value)]> {
    match value {
        Value::Map(entries) => Some(entries),
        _ => None,
    }
}

/// Look up a map entry by text key.
#[must_use]
pub fn map_text_entry<'a>(entries: &'a [(Value, Value)], key: &str) -> Option<&'a Value> {
    entries
        .iter()
        .find_map(|(k, v)| (k.as_text() == Some(key)).then_some(v))
}

/// Look up a map entry by (small) integer key.
#[must_use]
pub fn map_integer_entry(entries: &[(Value, Value)], key: i64) -> Option<&Value> {
    entries.iter().find_map(|(k, v)| match k {
        Value::Integer(i) if i128::from(*i) == i128::from(key) => Some(v),
        _ => None,
    })
}

/// Narrow a CBOR value to an i64, the range COSE identifiers live in.
#[must_use]
pub fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => i64::try_from(i128::from(*i)).ok(),
        _ => None,
    }
}
