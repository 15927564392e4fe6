//! Text normalization and input format checks.
//!
//! # Responsibility
//! - Normalize raw optional text into the canonical stored form.
//! - Offer phone/email/date format checks for callers that collect input.
//!
//! # Invariants
//! - `normalize_text` never returns leading or trailing whitespace.
//! - Format checks are pure and never reject at the storage layer.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PHONE_PATTERN: &str = r"^((8|\+7)[\- ]?)?(\(?\d{3}\)?[\- ]?)?[\d\- ]{3,15}$";
const EMAIL_PATTERN: &str = concat!(
    r"^([a-zA-Z0-9]+(?:[._+-][a-zA-Z0-9]+)*)",
    r"@([a-zA-Z0-9]+(?:[.-][a-zA-Z0-9]+)*[.][a-zA-Z]{2,})$",
);

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(PHONE_PATTERN).expect("valid phone regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("valid email regex"));

const BIRTHDAY_FORMAT: &str = "%Y-%m-%d";

/// Returns the trimmed text, or an empty string for absent/blank input.
pub fn normalize_text(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// Returns whether `value` looks like a phone number.
///
/// Accepts an optional `8`/`+7` trunk prefix, an optional (bracketed)
/// three digit area code and 3..=15 trailing digits, dashes or spaces.
pub fn is_phone_number(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// Returns whether `value` looks like an email address.
pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Error returned when birthday text is not a `YYYY-MM-DD` calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayParseError {
    pub input: String,
    pub message: String,
}

impl Display for BirthdayParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid birthday `{}`: {} (expected YYYY-MM-DD)",
            self.input, self.message
        )
    }
}

impl Error for BirthdayParseError {}

/// Parses `YYYY-MM-DD` birthday text.
///
/// Surrounding whitespace is ignored. Impossible dates such as
/// `2001-02-29` are rejected.
pub fn parse_birthday(value: &str) -> Result<NaiveDate, BirthdayParseError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, BIRTHDAY_FORMAT).map_err(|err| BirthdayParseError {
        input: trimmed.to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{is_email, is_phone_number, normalize_text, parse_birthday};
    use chrono::NaiveDate;

    #[test]
    fn normalize_text_trims_and_blanks_to_empty() {
        assert_eq!(normalize_text(None), "");
        assert_eq!(normalize_text(Some("   \t\n")), "");
        assert_eq!(normalize_text(Some("  Ivan  Petrov ")), "Ivan  Petrov");
    }

    #[test]
    fn phone_format_accepts_common_shapes() {
        assert!(is_phone_number("8-900-123-45-67"));
        assert!(is_phone_number("+7 (900) 123-45-67"));
        assert!(is_phone_number("123-45-67"));
        assert!(!is_phone_number("call me"));
        assert!(!is_phone_number("12"));
    }

    #[test]
    fn email_format_requires_domain_with_tld() {
        assert!(is_email("ivan.petrov@mail.ru"));
        assert!(is_email("a+b@sub.example.com"));
        assert!(!is_email("ivan@localhost"));
        assert!(!is_email("not an email"));
        assert!(!is_email("prefix ivan@mail.ru"));
    }

    #[test]
    fn parse_birthday_accepts_iso_dates_only() {
        assert_eq!(
            parse_birthday(" 2000-01-31 ").unwrap(),
            NaiveDate::from_ymd_opt(2000, 1, 31).unwrap()
        );
        let err = parse_birthday("2001-02-29").unwrap_err();
        assert_eq!(err.input, "2001-02-29");
        assert!(parse_birthday("31.01.2000").is_err());
    }
}
