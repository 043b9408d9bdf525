//! `WebAuthn` binary-format decoding
//!
//! This module owns the precise part of the system: the CBOR attestation
//! object, the packed authenticator-data layout, and the COSE public key.
//! Wrong bit offsets or wrong byte order silently corrupt every derived
//! field, which is why the cursor and decoders here are tested explicitly.

pub mod assertion;
pub mod attestation;
pub mod authenticator_data;
pub mod cbor;
pub mod cose;
pub mod cursor;
mod errors;
mod types;

// Re-exports for public use
pub use assertion::extract_assertion_metadata;
pub use attestation::extract_attestation_metadata;
pub use cursor::ByteCursor;
pub use errors::{CeremonyError, DecodeError};
pub use types::*;
