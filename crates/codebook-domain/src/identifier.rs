//! Identifier grammar for codebook variable names
//!
//! A variable name is 1-32 characters, starts with an uppercase ASCII letter
//! or underscore, and continues with uppercase ASCII letters, digits or
//! underscores. Free-text sources are uppercased with [`normalize`] before the
//! check; table and CSV sources are checked as extracted.

/// Maximum identifier length accepted by survey codebooks (SAS name limit)
pub const MAX_IDENTIFIER_LEN: usize = 32;

/// Returns true iff `token` is a plausible variable identifier
///
/// # Examples
///
/// ```
/// use codebook_domain::identifier::is_valid_identifier;
///
/// assert!(is_valid_identifier("SEXORIEN"));
/// assert!(is_valid_identifier("_STATE"));
/// assert!(!is_valid_identifier("sexorien"));
/// assert!(!is_valid_identifier("1234"));
/// ```
pub fn is_valid_identifier(token: &str) -> bool {
    let bytes = token.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_IDENTIFIER_LEN {
        return false;
    }

    let head = bytes[0];
    if !(head.is_ascii_uppercase() || head == b'_') {
        return false;
    }

    bytes[1..]
        .iter()
        .all(|&b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}

/// Case-normalize a free-text token: trim surrounding whitespace and uppercase
pub fn normalize(token: &str) -> String {
    token.trim().to_uppercase()
}

/// Normalize then validate; returns the normalized token when it is valid
pub fn normalize_and_validate(token: &str) -> Option<String> {
    let normalized = normalize(token);
    is_valid_identifier(&normalized).then_some(normalized)
}
