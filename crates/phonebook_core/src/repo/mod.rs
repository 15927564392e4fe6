//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the snapshot load/save contract used by the phone book.
//! - Isolate file format and file system details from the service layer.
//!
//! # Invariants
//! - Saves replace the whole snapshot; there are no partial writes.
//! - Loads preserve persisted order and skip malformed entries.

pub mod contact_repo;
