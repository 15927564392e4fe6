//! Phone book domain model.
//!
//! # Responsibility
//! - Define the contact record and the normalization rules it owns.
//! - Provide format checks shared by input-collecting callers.
//!
//! # Invariants
//! - Records are immutable values; the phone book replaces, never edits.
//! - Absent text is an empty string, an unknown birthday is `None`.

pub mod contact;
pub mod format;
