//! PBKDF2-HMAC-SHA256 password hashes, stored as
//! `pbkdf2:<iterations>:<base64 salt>:<base64 hash>`.

use crate::error::{PlannerError, Result};
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::Sha256;

pub const DEFAULT_ITERATIONS: u32 = 100_000;

const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;
const SCHEME: &str = "pbkdf2";

pub fn hash_password(password: &str) -> String {
    hash_password_with(password, DEFAULT_ITERATIONS)
}

pub fn hash_password_with(password: &str, iterations: u32) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let hash = derive(password, &salt, iterations);
    format!(
        "{SCHEME}:{iterations}:{}:{}",
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(hash)
    )
}

/// Check `password` against a stored hash. A malformed stored hash is an
/// error, not a mismatch.
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let mut parts = stored.split(':');
    let (Some(SCHEME), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(PlannerError::MalformedPasswordHash);
    };
    let iterations: u32 = iterations
        .parse()
        .map_err(|_| PlannerError::MalformedPasswordHash)?;
    let salt = STANDARD_NO_PAD
        .decode(salt)
        .map_err(|_| PlannerError::MalformedPasswordHash)?;
    let expected = STANDARD_NO_PAD
        .decode(hash)
        .map_err(|_| PlannerError::MalformedPasswordHash)?;
    if iterations == 0 || expected.len() != HASH_LEN {
        return Err(PlannerError::MalformedPasswordHash);
    }

    let actual = derive(password, &salt, iterations);
    Ok(constant_time_eq(&actual, &expected))
}

/// Spend the cost of a default-strength check on a fixed salt. Used when no
/// stored hash exists; the answer is always `false`.
pub fn verify_unknown(password: &str) -> bool {
    std::hint::black_box(derive(password, &[0u8; SALT_LEN], DEFAULT_ITERATIONS));
    false
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}
