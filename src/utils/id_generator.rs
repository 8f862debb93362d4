//! Opaque record identifiers.
//!
//! Entities and press releases are keyed by random, URL-safe strings rather
//! than sequential integers so that ids leak nothing about volume. The
//! human-facing sequence lives in [`crate::domain::identifier`].

use base64::Engine as _;

/// Length of random bytes before base64 encoding.
const ID_LENGTH_BYTES: usize = 9;

/// Generates a cryptographically secure random record id.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing a 12-character id.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_id() -> String {
    let mut buffer = [0u8; ID_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}

/// Returns true if `id` has the shape produced by [`generate_id`].
///
/// Used to reject path parameters early instead of querying for them.
pub fn is_valid_id(id: &str) -> bool {
    id.len() == 12
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
