//! Prefix search over normalized contact text.
//!
//! # Responsibility
//! - Define the search normalization shared by queries and fields.
//! - Evaluate name/phone/birthday predicates against contacts.
//!
//! # Invariants
//! - Text matching is always a prefix test on normalized forms.
//! - Results keep the input order; nothing is re-sorted.
//! - An unknown birthday never matches a birthday query.

use crate::model::contact::Contact;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALPHANUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("valid non-alphanumeric regex"));

/// Strips whitespace and every non letter/digit character, then lowercases.
///
/// `"8-900-123 45 67"` becomes `"89001234567"`, `"Petrov Ivan"` becomes
/// `"petrovivan"`.
pub fn normalize_for_search(value: &str) -> String {
    NON_ALPHANUMERIC_RE.replace_all(value, "").to_lowercase()
}

/// One search predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactQuery {
    /// Prefix of `family_name + given_name + patronymic`.
    Name(String),
    /// Prefix of any phone number.
    Phone(String),
    /// Exact birthday.
    Birthday(NaiveDate),
}

impl ContactQuery {
    /// Returns a reusable matcher with the query text normalized once.
    pub fn matcher(&self) -> ContactMatcher {
        match self {
            Self::Name(text) => ContactMatcher::Name(normalize_for_search(text)),
            Self::Phone(text) => ContactMatcher::Phone(normalize_for_search(text)),
            Self::Birthday(date) => ContactMatcher::Birthday(*date),
        }
    }
}

/// Query with its text already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactMatcher {
    Name(String),
    Phone(String),
    Birthday(NaiveDate),
}

impl ContactMatcher {
    pub fn matches(&self, contact: &Contact) -> bool {
        match self {
            Self::Name(prefix) => search_name(contact).starts_with(prefix.as_str()),
            Self::Phone(prefix) => contact
                .phone_numbers()
                .iter()
                .any(|number| normalize_for_search(number).starts_with(prefix.as_str())),
            Self::Birthday(date) => contact.birthday() == Some(*date),
        }
    }
}

/// Returns the contacts matching `query`, in input order.
pub fn search_contacts<'a, I>(contacts: I, query: &ContactQuery) -> Vec<Contact>
where
    I: IntoIterator<Item = &'a Contact>,
{
    let matcher = query.matcher();
    contacts
        .into_iter()
        .filter(|contact| matcher.matches(contact))
        .cloned()
        .collect()
}

fn search_name(contact: &Contact) -> String {
    let full_name = format!(
        "{}{}{}",
        contact.family_name(),
        contact.given_name(),
        contact.patronymic()
    );
    normalize_for_search(&full_name)
}

#[cfg(test)]
mod tests {
    use super::{normalize_for_search, search_contacts, ContactQuery};
    use crate::model::contact::{Contact, ContactDraft};

    fn named(given: &str, family: &str, patronymic: &str) -> Contact {
        Contact::new(ContactDraft {
            given_name: Some(given.to_string()),
            family_name: Some(family.to_string()),
            patronymic: Some(patronymic.to_string()),
            ..ContactDraft::default()
        })
    }

    #[test]
    fn normalize_strips_separators_and_lowercases() {
        assert_eq!(normalize_for_search("8-900-123 45 67"), "89001234567");
        assert_eq!(normalize_for_search("+7 (900) 123"), "7900123");
        assert_eq!(normalize_for_search("  O'Brien_Jr. "), "obrienjr");
        assert_eq!(normalize_for_search("Петров Иван"), "петровиван");
        assert_eq!(normalize_for_search(" \t"), "");
    }

    #[test]
    fn name_key_is_family_then_given_then_patronymic() {
        let contact = named("Ivan", "Petrov", "Sergeevich");
        let contacts = [contact.clone()];

        let by_family = search_contacts(&contacts, &ContactQuery::Name("petrov iv".into()));
        assert_eq!(by_family, vec![contact]);

        let by_given = search_contacts(&contacts, &ContactQuery::Name("Ivan".into()));
        assert!(by_given.is_empty());
    }
}
