//! Core domain logic for the phone book.
//! This crate is the single source of truth for contact invariants.

pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{Contact, ContactDraft, ContactIdentity, ContactValidationError};
pub use model::format::{
    is_email, is_phone_number, normalize_text, parse_birthday, BirthdayParseError,
};
pub use repo::contact_repo::{
    ContactRepository, JsonFileContactRepository, LoadReport, MemoryContactRepository, RepoError,
    RepoResult,
};
pub use search::prefix::{normalize_for_search, search_contacts, ContactMatcher, ContactQuery};
pub use service::phone_book::{PhoneBook, PhoneBookError, PhoneBookResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
