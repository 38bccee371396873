//! Password strength scoring.
//!
//! A heuristic, not a cryptographic measure: unique characters earn credit,
//! repeats earn less, and mixing character classes earns a bonus.

use std::collections::HashMap;

use crate::error::{QuireError, Result};

/// Minimum score a new password must reach.
pub const MIN_PASSWORD_SCORE: i32 = 30;

/// Credit for a character's first occurrence; the n-th occurrence earns
/// `CHARACTER_CREDIT / n`, so a character stops scoring after five uses.
const CHARACTER_CREDIT: i32 = 5;

/// Bonus per character class beyond the first.
const VARIATION_BONUS: i32 = 10;

/// Score a password.
///
/// Each character adds `5 / occurrences_so_far` (integer division). Then
/// `10 * (classes - 1)` is added, where the classes are ASCII digits, ASCII
/// lowercase, ASCII uppercase, and non-word characters (anything outside
/// `[A-Za-z0-9_]`). A password made only of underscores has no class and
/// scores below zero.
///
/// # Examples
///
/// ```
/// use quire_core::crypto::score;
///
/// assert_eq!(score(""), 0);
/// assert_eq!(score("aaa"), 8);
/// ```
pub fn score(password: &str) -> i32 {
    if password.is_empty() {
        return 0;
    }

    let mut occurrences: HashMap<char, i32> = HashMap::new();
    let mut total = 0;
    for ch in password.chars() {
        let seen = occurrences.entry(ch).or_insert(0);
        *seen += 1;
        total += CHARACTER_CREDIT / *seen;
    }

    let classes = [
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '_')),
    ];
    let variation_count = classes.iter().filter(|present| **present).count() as i32;

    total + (variation_count - 1) * VARIATION_BONUS
}

/// Validate that a password meets the strength gate.
///
/// # Returns
///
/// Returns `Ok(())` if the score is at least [`MIN_PASSWORD_SCORE`], or
/// `QuireError::WeakCredential` carrying the score.
///
/// # Examples
///
/// ```
/// use quire_core::crypto::validate_password;
///
/// assert!(validate_password("Tr0ub4dor&3").is_ok());
/// assert!(validate_password("abc").is_err());
/// ```
pub fn validate_password(password: &str) -> Result<()> {
    let score = score(password);
    if score < MIN_PASSWORD_SCORE {
        return Err(QuireError::WeakCredential {
            score,
            minimum: MIN_PASSWORD_SCORE,
        });
    }
    Ok(())
}
