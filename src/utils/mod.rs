//! Shared utilities

pub mod base64url;

pub use base64url::{base64url_to_bytes, bytes_to_base64url};
