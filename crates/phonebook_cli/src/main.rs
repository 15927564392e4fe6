//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `phonebook_core` linkage.
//! - Optionally open a phone book file and report its size.
//!
//! Output is `key=value` lines only; contact contents are never printed.

use phonebook_core::PhoneBook;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("phonebook_core version={}", phonebook_core::core_version());

    let Some(path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match PhoneBook::open(&path) {
        Ok(book) => {
            println!("phonebook path={}", book.path().display());
            println!("phonebook contacts={}", book.len());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("phonebook error={err}");
            ExitCode::FAILURE
        }
    }
}
