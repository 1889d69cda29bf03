/// Input validators
/// - Email format and length checks for account creation and updates
/// - Chirp body length limit and profanity filter

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
pub const MAX_CHIRP_LENGTH: usize = 140;
const CENSORED: &str = "****";

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();

    static ref PROFANE_WORDS: HashSet<&'static str> =
        ["kerfuffle", "sharbert", "fornax"].into_iter().collect();
}

/// Validates an email address
///
/// The address is returned exactly as given: no trimming, no case folding.
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }

    Ok(email.to_string())
}

/// Passwords only need to be present; strength is the client's concern.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()));
    }
    Ok(())
}

/// Enforces the chirp length limit and masks profane words
///
/// Words are split on whitespace and rejoined with single spaces; a word is
/// masked when it matches a profane word case-insensitively. Punctuation
/// attached to a word prevents the match.
pub fn clean_chirp_body(body: &str) -> Result<String, ValidationError> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ValidationError::TooLong("chirp".to_string(), MAX_CHIRP_LENGTH));
    }

    let cleaned = body
        .split_whitespace()
        .map(|word| {
            if PROFANE_WORDS.contains(word.to_lowercase().as_str()) {
                CENSORED
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.is_empty() {
        return Err(ValidationError::EmptyField("chirp".to_string()));
    }

    Ok(cleaned)
}
