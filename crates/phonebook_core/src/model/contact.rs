//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical person record stored by the phone book.
//! - Normalize raw caller input into that record.
//! - Define the on-disk entry shape and its decoding rules.
//!
//! # Invariants
//! - Text fields are trimmed and never contain only whitespace.
//! - `phone_numbers` never contains blank entries.
//! - A contact is never mutated after construction.
//! - Identity is the exact `(given_name, family_name, patronymic)` triple.

use crate::model::format::{normalize_text, parse_birthday, BirthdayParseError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raw, not yet normalized contact input.
///
/// Every field is optional; absent values become empty strings (or an
/// empty phone list / unknown birthday) once turned into a [`Contact`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub patronymic: Option<String>,
    pub address: Option<String>,
    pub phone_numbers: Option<Vec<String>>,
    /// Already-parsed date; see [`crate::parse_birthday`] for text input.
    pub birthday: Option<NaiveDate>,
    pub email: Option<String>,
}

/// Borrowed identity triple used for duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactIdentity<'a> {
    pub given_name: &'a str,
    pub family_name: &'a str,
    pub patronymic: &'a str,
}

impl ContactIdentity<'_> {
    /// Returns whether all three identity parts are empty.
    pub fn is_blank(&self) -> bool {
        self.given_name.is_empty() && self.family_name.is_empty() && self.patronymic.is_empty()
    }
}

/// One person record.
///
/// Serialized as a camelCase JSON object; `birthday` is an ISO-8601
/// `YYYY-MM-DD` string or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ContactEntry")]
pub struct Contact {
    given_name: String,
    family_name: String,
    patronymic: String,
    address: String,
    phone_numbers: Vec<String>,
    birthday: Option<NaiveDate>,
    email: String,
}

impl Contact {
    /// Builds a normalized contact from raw input.
    ///
    /// Total over its input: rejection rules (blank or duplicate identity)
    /// belong to the phone book, not to the record.
    pub fn new(draft: ContactDraft) -> Self {
        let phone_numbers = draft
            .phone_numbers
            .unwrap_or_default()
            .into_iter()
            .map(|number| normalize_text(Some(&number)))
            .filter(|number| !number.is_empty())
            .collect();

        Self {
            given_name: normalize_text(draft.given_name.as_deref()),
            family_name: normalize_text(draft.family_name.as_deref()),
            patronymic: normalize_text(draft.patronymic.as_deref()),
            address: normalize_text(draft.address.as_deref()),
            phone_numbers,
            birthday: draft.birthday,
            email: normalize_text(draft.email.as_deref()),
        }
    }

    pub fn given_name(&self) -> &str {
        &self.given_name
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn patronymic(&self) -> &str {
        &self.patronymic
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Phone numbers in entry order, duplicates included.
    pub fn phone_numbers(&self) -> &[String] {
        &self.phone_numbers
    }

    pub fn birthday(&self) -> Option<NaiveDate> {
        self.birthday
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the identity triple used for uniqueness checks.
    pub fn identity(&self) -> ContactIdentity<'_> {
        ContactIdentity {
            given_name: &self.given_name,
            family_name: &self.family_name,
            patronymic: &self.patronymic,
        }
    }
}

impl From<ContactDraft> for Contact {
    fn from(value: ContactDraft) -> Self {
        Self::new(value)
    }
}

/// Decoding failure for a single persisted contact entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    InvalidBirthday(BirthdayParseError),
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBirthday(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContactValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidBirthday(err) => Some(err),
        }
    }
}

/// Lenient wire shape of one persisted entry.
///
/// Missing fields and `null` are treated as absent. `name`/`surname` are
/// read for files written before the field rename; when both spellings are
/// present, `givenName`/`familyName` win.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ContactEntry {
    given_name: Option<String>,
    family_name: Option<String>,
    name: Option<String>,
    surname: Option<String>,
    patronymic: Option<String>,
    address: Option<String>,
    phone_numbers: Option<Vec<Option<String>>>,
    birthday: Option<String>,
    email: Option<String>,
}

impl TryFrom<ContactEntry> for Contact {
    type Error = ContactValidationError;

    fn try_from(value: ContactEntry) -> Result<Self, Self::Error> {
        // Older files stored an unknown birthday as "".
        let birthday = match value.birthday.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => {
                Some(parse_birthday(text).map_err(ContactValidationError::InvalidBirthday)?)
            }
        };

        let phone_numbers = value
            .phone_numbers
            .map(|numbers| numbers.into_iter().flatten().collect());

        Ok(Self::new(ContactDraft {
            given_name: value.given_name.or(value.name),
            family_name: value.family_name.or(value.surname),
            patronymic: value.patronymic,
            address: value.address,
            phone_numbers,
            birthday,
            email: value.email,
        }))
    }
}
