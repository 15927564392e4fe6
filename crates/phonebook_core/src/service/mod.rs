//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, search and repository calls into the phone
//!   book API consumed by front ends.
//! - Keep front ends decoupled from file format details.

pub mod phone_book;
