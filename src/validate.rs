//! Input validation for book records
//!
//! Every value typed at the console passes through one of these functions
//! before it reaches a store. They are pure, so the storage layer and the
//! prompts can be tested independently.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Longest accepted title, in characters
pub const MAX_TITLE_LEN: usize = 200;

/// Longest accepted author name, in characters
pub const MAX_AUTHOR_LEN: usize = 99;

lazy_static! {
    static ref NAME_PATTERN: Regex = Regex::new(r"^[A-Za-z\s]+$").unwrap();
    static ref DATE_PATTERN: Regex = Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap();
}

/// Reasons a console value is rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must only use letters A-Z (a-z) and spaces")]
    InvalidCharacters { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("date must be in the format MM/DD/YYYY")]
    InvalidDate,

    #[error("'{0}' is not a valid book id")]
    InvalidId(String),
}

/// Capitalize the first letter of every word and lowercase the rest.
///
/// A word starts at any letter that does not directly follow another letter,
/// so `"o'neil"` becomes `"O'Neil"`.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_letter = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if prev_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(c);
            prev_letter = false;
        }
    }
    out
}

fn validate_name(input: &str, field: &'static str, max: usize) -> Result<String, ValidationError> {
    let value = title_case(input);
    if !NAME_PATTERN.is_match(&value) {
        return Err(ValidationError::InvalidCharacters { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value)
}

/// Title-case a book title and check it against the title rules
pub fn validate_title(input: &str) -> Result<String, ValidationError> {
    validate_name(input, "title", MAX_TITLE_LEN)
}

/// Title-case an author name and check it against the author rules
pub fn validate_author(input: &str) -> Result<String, ValidationError> {
    validate_name(input, "author", MAX_AUTHOR_LEN)
}

/// Check a completion date has the `MM/DD/YYYY` shape.
///
/// Only the shape is checked: `13/40/9999` is accepted and returned as is.
pub fn validate_date(input: &str) -> Result<String, ValidationError> {
    if DATE_PATTERN.is_match(input) {
        Ok(input.to_string())
    } else {
        Err(ValidationError::InvalidDate)
    }
}

/// Parse the id typed at the delete prompt
pub fn parse_record_id(input: &str) -> Result<i64, ValidationError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidId(input.trim().to_string()))
}

/// Whether the answer to a delete prompt confirms the deletion
pub fn is_confirmation(input: &str) -> bool {
    input.eq_ignore_ascii_case("yes")
}
