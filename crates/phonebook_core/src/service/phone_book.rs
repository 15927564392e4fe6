//! Phone book use-case service.
//!
//! # Responsibility
//! - Own the ordered contact list and its uniqueness rules.
//! - Persist the full snapshot after every successful mutation.
//! - Answer name/phone/birthday searches from memory.
//!
//! # Invariants
//! - Contacts keep insertion order, also across reloads.
//! - No two contacts share an identity triple; no identity is blank.
//! - After any call returns, memory equals the last persisted snapshot:
//!   a failed save rolls the in-memory change back.
//! - Searches and accessors never touch the repository.

use crate::model::contact::{Contact, ContactDraft};
use crate::repo::contact_repo::{ContactRepository, JsonFileContactRepository, RepoError};
use crate::search::prefix::{search_contacts, ContactQuery};
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type PhoneBookResult<T> = Result<T, PhoneBookError>;

/// Service error for phone book operations.
#[derive(Debug)]
pub enum PhoneBookError {
    /// Backing snapshot could not be read or written.
    Repo(RepoError),
}

impl Display for PhoneBookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PhoneBookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for PhoneBookError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Ordered contact collection bound to a snapshot repository.
#[derive(Debug)]
pub struct PhoneBook<R: ContactRepository = JsonFileContactRepository> {
    repo: R,
    contacts: Vec<Contact>,
}

impl PhoneBook<JsonFileContactRepository> {
    /// Opens the phone book stored at `path`.
    ///
    /// A missing file yields an empty phone book; the file is created on
    /// the first successful mutation.
    ///
    /// # Errors
    /// - `RepoError::InvalidPath` when `path` is blank.
    /// - `RepoError::Io` / `Deserialization` / `InvalidDocument` when an
    ///   existing file cannot be read as a contact list.
    pub fn open(path: impl AsRef<Path>) -> PhoneBookResult<Self> {
        let repo = JsonFileContactRepository::new(path)?;
        Self::with_repository(repo)
    }

    pub fn path(&self) -> &Path {
        self.repo.path()
    }
}

impl<R: ContactRepository> PhoneBook<R> {
    /// Creates a phone book from the repository's current snapshot.
    pub fn with_repository(repo: R) -> PhoneBookResult<Self> {
        let report = repo.load()?;
        if report.skipped > 0 {
            warn!(
                "event=phone_book_open module=service status=ok loaded={} skipped={}",
                report.contacts.len(),
                report.skipped
            );
        } else {
            info!(
                "event=phone_book_open module=service status=ok loaded={}",
                report.contacts.len()
            );
        }

        Ok(Self {
            repo,
            contacts: report.contacts,
        })
    }

    /// Adds a contact built from `draft`.
    ///
    /// Returns `Ok(false)` without any change when the identity triple is
    /// blank or already taken. On success the new contact is the last
    /// element of [`Self::contacts`].
    ///
    /// # Errors
    /// - Returns `PhoneBookError::Repo` when the snapshot cannot be saved;
    ///   the contact is not kept in that case.
    pub fn add_contact(&mut self, draft: ContactDraft) -> PhoneBookResult<bool> {
        let contact = Contact::new(draft);
        let identity = contact.identity();

        if identity.is_blank() {
            info!("event=contact_add module=service status=rejected reason=blank_identity");
            return Ok(false);
        }
        if self
            .contacts
            .iter()
            .any(|existing| existing.identity() == identity)
        {
            info!("event=contact_add module=service status=rejected reason=duplicate_identity");
            return Ok(false);
        }

        self.contacts.push(contact);
        if let Err(err) = self.repo.save(&self.contacts) {
            self.contacts.pop();
            return Err(err.into());
        }

        info!(
            "event=contact_add module=service status=ok count={}",
            self.contacts.len()
        );
        Ok(true)
    }

    /// Removes the first contact equal to `contact`.
    ///
    /// Returns `Ok(false)` without writing when no such contact exists.
    ///
    /// # Errors
    /// - Returns `PhoneBookError::Repo` when the snapshot cannot be saved;
    ///   the contact is restored at its old position in that case.
    pub fn delete_contact(&mut self, contact: &Contact) -> PhoneBookResult<bool> {
        let Some(index) = self
            .contacts
            .iter()
            .position(|existing| existing == contact)
        else {
            info!("event=contact_delete module=service status=skip reason=not_found");
            return Ok(false);
        };

        let removed = self.contacts.remove(index);
        if let Err(err) = self.repo.save(&self.contacts) {
            self.contacts.insert(index, removed);
            return Err(err.into());
        }

        info!(
            "event=contact_delete module=service status=ok count={}",
            self.contacts.len()
        );
        Ok(true)
    }

    /// Contacts whose `family + given + patronymic` starts with `prefix`
    /// after search normalization. An empty prefix matches everything.
    pub fn find_by_name(&self, prefix: &str) -> Vec<Contact> {
        self.search(&ContactQuery::Name(prefix.to_string()))
    }

    /// Contacts with at least one phone number starting with `prefix`
    /// after search normalization.
    pub fn find_by_phone(&self, prefix: &str) -> Vec<Contact> {
        self.search(&ContactQuery::Phone(prefix.to_string()))
    }

    /// Contacts born exactly on `date`.
    pub fn find_by_birthday(&self, date: NaiveDate) -> Vec<Contact> {
        self.search(&ContactQuery::Birthday(date))
    }

    /// Runs `query` over all contacts, keeping phone book order.
    pub fn search(&self, query: &ContactQuery) -> Vec<Contact> {
        search_contacts(&self.contacts, query)
    }

    /// Returns a copy of all contacts in insertion order.
    pub fn all_contacts(&self) -> Vec<Contact> {
        self.contacts.clone()
    }

    /// Read-only view of all contacts in insertion order.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// The most recently added contact, if any.
    pub fn last_added(&self) -> Option<&Contact> {
        self.contacts.last()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }
}
