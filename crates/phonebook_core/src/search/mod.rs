//! Contact search entry points.
//!
//! # Responsibility
//! - Expose prefix queries over normalized contact text.
//! - Keep matching rules inside core so every caller searches alike.

pub mod prefix;
