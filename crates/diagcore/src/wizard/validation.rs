//! Contact field validation
//!
//! Syntactic checks only: a valid email is not necessarily deliverable.
//! Every function here is pure and total.

use once_cell::sync::Lazy;
use regex::Regex;

/// Letters (Latin, Latin-1 supplement, Latin Extended-A/B, Cyrillic incl. Ё/ё),
/// whitespace and hyphens. × and ÷ are excluded from the Latin-1 range.
static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z\x{00C0}-\x{00D6}\x{00D8}-\x{00F6}\x{00F8}-\x{024F}А-Яа-яЁё\s-]+$").expect("name regex is valid")
});

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email regex is valid"));

/// Minimum name length in characters
pub const MIN_NAME_LEN: usize = 2;

/// Returns true when the name only consists of letters, spaces and hyphens
pub fn has_valid_name_chars(name: &str) -> bool {
    NAME_RE.is_match(name)
}

/// Returns true when the name is at least [`MIN_NAME_LEN`] characters long
pub fn has_valid_name_len(name: &str) -> bool {
    name.chars().count() >= MIN_NAME_LEN
}

/// Full name check: non-empty, allowed characters only, long enough.
///
/// # Examples
/// ```
/// use diagcore::wizard::validation::is_valid_name;
///
/// assert!(is_valid_name("Anna Maria-Lee"));
/// assert!(is_valid_name("Алёна"));
/// assert!(!is_valid_name("A"));
/// assert!(!is_valid_name("Anna123"));
/// ```
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && has_valid_name_chars(name) && has_valid_name_len(name)
}

/// Conventional `local@domain.tld` check.
///
/// # Examples
/// ```
/// use diagcore::wizard::validation::is_valid_email;
///
/// assert!(is_valid_email("a@b.co"));
/// assert!(!is_valid_email("not-an-email"));
/// assert!(!is_valid_email("a@b"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
