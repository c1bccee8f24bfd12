//! Opaque token generation.
//!
//! Email-verification and password-reset tokens are plain random values:
//! stored server-side next to an expiry, compared by exact match, spent on
//! first use. They carry no claims and cannot be forged offline.

use base64::{Engine, engine::general_purpose};
use rand::{RngCore, rngs::OsRng};

/// Length in bytes of the random material behind a one-time token
const ONE_TIME_TOKEN_BYTES: usize = 32;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Generate an opaque single-use token (URL-safe base64, no padding)
pub fn one_time_token() -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(random_bytes(ONE_TIME_TOKEN_BYTES))
}
