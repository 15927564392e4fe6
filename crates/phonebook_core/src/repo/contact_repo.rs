//! Contact snapshot repository contracts and implementations.
//!
//! # Responsibility
//! - Read and write the full contact list as one JSON document.
//! - Keep file handling (missing file, atomic replace) inside core.
//!
//! # Invariants
//! - `save` replaces the previous document atomically via rename.
//! - A missing or blank file loads as an empty list.
//! - A document that is not a JSON array is a hard failure; individual
//!   malformed entries are skipped and counted.
//! - File handles never outlive a single `load`/`save` call.

use crate::model::contact::Contact;
use log::{error, info, warn};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for snapshot persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Backing path is empty or whitespace-only.
    InvalidPath(String),
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Serialization(serde_json::Error),
    Deserialization {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Document parsed as JSON but is not a list of contacts.
    InvalidDocument {
        path: PathBuf,
        message: String,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath(path) => write!(f, "invalid contact file path `{path}`"),
            Self::Io { path, source } => {
                write!(f, "contact file `{}` i/o failure: {source}", path.display())
            }
            Self::Serialization(err) => write!(f, "failed to serialize contacts: {err}"),
            Self::Deserialization { path, source } => write!(
                f,
                "failed to parse contact file `{}`: {source}",
                path.display()
            ),
            Self::InvalidDocument { path, message } => {
                write!(f, "invalid contact file `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPath(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Serialization(err) => Some(err),
            Self::Deserialization { source, .. } => Some(source),
            Self::InvalidDocument { .. } => None,
        }
    }
}

/// Outcome of a snapshot load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Decoded contacts in persisted order.
    pub contacts: Vec<Contact>,
    /// Entries dropped as malformed, blank or duplicate.
    pub skipped: usize,
}

/// Snapshot persistence contract for the phone book.
pub trait ContactRepository {
    fn load(&self) -> RepoResult<LoadReport>;
    fn save(&self, contacts: &[Contact]) -> RepoResult<()>;
}

/// JSON file-backed contact repository.
#[derive(Debug, Clone)]
pub struct JsonFileContactRepository {
    path: PathBuf,
}

impl JsonFileContactRepository {
    /// Binds the repository to `path` without touching the file system.
    ///
    /// # Errors
    /// - Returns `InvalidPath` when `path` is blank.
    pub fn new(path: impl AsRef<Path>) -> RepoResult<Self> {
        let raw = path.as_ref();
        let path = match raw.to_str().map(str::trim) {
            Some("") => return Err(RepoError::InvalidPath(raw.display().to_string())),
            Some(trimmed) => PathBuf::from(trimmed),
            None => raw.to_path_buf(),
        };
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> RepoError {
        RepoError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_document(&self) -> RepoResult<LoadReport> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("event=contacts_load module=repo status=skip reason=file_missing");
                return Ok(LoadReport::default());
            }
            Err(err) => return Err(self.io_error(err)),
        };

        if text.trim().is_empty() {
            return Ok(LoadReport::default());
        }

        let document: Value =
            serde_json::from_str(&text).map_err(|source| RepoError::Deserialization {
                path: self.path.clone(),
                source,
            })?;
        let entries = match document {
            Value::Array(entries) => entries,
            other => {
                return Err(RepoError::InvalidDocument {
                    path: self.path.clone(),
                    message: format!("expected a JSON array, got {}", json_kind(&other)),
                });
            }
        };

        Ok(decode_entries(entries))
    }

    fn write_document(&self, contacts: &[Contact]) -> RepoResult<()> {
        let mut bytes = serde_json::to_vec_pretty(contacts).map_err(RepoError::Serialization)?;
        bytes.push(b'\n');

        // Replace the content behind a symlink, not the link itself.
        let (target, permissions) = match std::fs::canonicalize(&self.path) {
            Ok(resolved) => {
                let permissions = std::fs::metadata(&resolved)
                    .map_err(|err| self.io_error(err))?
                    .permissions();
                (resolved, Some(permissions))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => (self.path.clone(), None),
            Err(err) => return Err(self.io_error(err)),
        };

        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir).map_err(|err| self.io_error(err))?;
        if let Some(permissions) = permissions {
            staged
                .as_file()
                .set_permissions(permissions)
                .map_err(|err| self.io_error(err))?;
        }
        staged
            .write_all(&bytes)
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|err| self.io_error(err))?;
        staged
            .persist(&target)
            .map_err(|err| self.io_error(err.error))?;
        // The rename already landed; a failed directory sync must not turn
        // into a rollback of data that is on disk.
        if let Err(err) = sync_dir(dir) {
            warn!(
                "event=contacts_save module=repo status=degraded reason=dir_sync error={}",
                err
            );
        }
        Ok(())
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    std::fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

impl ContactRepository for JsonFileContactRepository {
    fn load(&self) -> RepoResult<LoadReport> {
        let started_at = Instant::now();
        info!("event=contacts_load module=repo status=start");

        match self.read_document() {
            Ok(report) => {
                info!(
                    "event=contacts_load module=repo status=ok duration_ms={} loaded={} skipped={}",
                    started_at.elapsed().as_millis(),
                    report.contacts.len(),
                    report.skipped
                );
                Ok(report)
            }
            Err(err) => {
                error!(
                    "event=contacts_load module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn save(&self, contacts: &[Contact]) -> RepoResult<()> {
        let started_at = Instant::now();

        match self.write_document(contacts) {
            Ok(()) => {
                info!(
                    "event=contacts_save module=repo status=ok duration_ms={} count={}",
                    started_at.elapsed().as_millis(),
                    contacts.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=contacts_save module=repo status=error duration_ms={} count={} error={}",
                    started_at.elapsed().as_millis(),
                    contacts.len(),
                    err
                );
                Err(err)
            }
        }
    }
}

/// In-memory repository for callers that do not need a file.
///
/// Single-threaded only; holds the last saved snapshot.
#[derive(Debug, Default)]
pub struct MemoryContactRepository {
    contacts: RefCell<Vec<Contact>>,
    saves: Cell<usize>,
}

impl MemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing snapshot, as if it had been loaded.
    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        Self {
            contacts: RefCell::new(contacts),
            saves: Cell::new(0),
        }
    }

    /// Returns a copy of the last saved snapshot.
    pub fn snapshot(&self) -> Vec<Contact> {
        self.contacts.borrow().clone()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl ContactRepository for MemoryContactRepository {
    fn load(&self) -> RepoResult<LoadReport> {
        Ok(LoadReport {
            contacts: self.snapshot(),
            skipped: 0,
        })
    }

    fn save(&self, contacts: &[Contact]) -> RepoResult<()> {
        *self.contacts.borrow_mut() = contacts.to_vec();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

impl<R: ContactRepository + ?Sized> ContactRepository for &R {
    fn load(&self) -> RepoResult<LoadReport> {
        (**self).load()
    }

    fn save(&self, contacts: &[Contact]) -> RepoResult<()> {
        (**self).save(contacts)
    }
}

fn decode_entries(entries: Vec<Value>) -> LoadReport {
    let mut report = LoadReport::default();
    let mut seen: HashSet<(String, String, String)> = HashSet::new();

    for (index, entry) in entries.into_iter().enumerate() {
        if !entry.is_object() {
            skip_entry(&mut report, index, "not_an_object");
            continue;
        }

        let contact = match serde_json::from_value::<Contact>(entry) {
            Ok(contact) => contact,
            Err(err) => {
                warn!(
                    "event=contacts_load_entry module=repo status=skip index={} reason=malformed \
                     error={}",
                    index, err
                );
                report.skipped += 1;
                continue;
            }
        };

        let identity = contact.identity();
        if identity.is_blank() {
            skip_entry(&mut report, index, "blank_identity");
            continue;
        }
        let key = (
            identity.given_name.to_string(),
            identity.family_name.to_string(),
            identity.patronymic.to_string(),
        );
        if !seen.insert(key) {
            skip_entry(&mut report, index, "duplicate_identity");
            continue;
        }

        report.contacts.push(contact);
    }

    report
}

fn skip_entry(report: &mut LoadReport, index: usize, reason: &str) {
    warn!(
        "event=contacts_load_entry module=repo status=skip index={} reason={}",
        index, reason
    );
    report.skipped += 1;
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_entries, JsonFileContactRepository, RepoError};
    use serde_json::json;
    use std::path::Path;

    #[test]
    fn new_rejects_blank_path_and_trims_others() {
        let err = JsonFileContactRepository::new("   ").unwrap_err();
        assert!(matches!(err, RepoError::InvalidPath(_)));

        let repo = JsonFileContactRepository::new("  book.json ").unwrap();
        assert_eq!(repo.path(), Path::new("book.json"));
    }

    #[test]
    fn decode_skips_bad_blank_and_duplicate_entries() {
        let entries = vec![
            json!({"givenName": "Ivan", "familyName": "Petrov"}),
            json!("not a contact"),
            json!({"givenName": 42}),
            json!({"givenName": "  ", "familyName": ""}),
            json!({"givenName": " Ivan ", "familyName": "Petrov"}),
            json!({"givenName": "Anna", "birthday": "2000-13-40"}),
            json!({"givenName": "Anna"}),
        ];

        let report = decode_entries(entries);
        assert_eq!(report.skipped, 5);
        let names: Vec<&str> = report.contacts.iter().map(|c| c.given_name()).collect();
        assert_eq!(names, vec!["Ivan", "Anna"]);
    }
}
