//! Short alias generation.
//!
//! Aliases are drawn from the operating system's random source and encoded
//! with the URL-safe base64 alphabet, so they can sit in a path segment
//! without escaping.

use base64::Engine as _;

/// Length of a generated alias.
pub const ALIAS_LENGTH: usize = 6;

/// Random bytes drawn per alias; 6 bytes encode to 8 characters, of which
/// the first [`ALIAS_LENGTH`] are kept.
const ALIAS_BYTES: usize = 6;

/// Generates a fresh random alias of [`ALIAS_LENGTH`] characters.
///
/// Uniqueness is not checked here; callers must still check the store
/// before writing.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
///
/// # Examples
///
/// ```ignore
/// let alias = generate_alias();
/// assert_eq!(alias.len(), 6);
/// assert!(alias.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
/// ```
pub fn generate_alias() -> String {
    let mut buffer = [0u8; ALIAS_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    let mut alias = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer);
    alias.truncate(ALIAS_LENGTH);
    alias
}
