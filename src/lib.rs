//! Timeline and recurring-payment engine for plain-text notes.
//!
//! Everything under this crate root is a pure function of a note snapshot:
//! parsing never fails outright, it degrades to fewer or undated entries.

pub mod amounts;
pub mod cache;
pub mod dates;
pub mod edit;
pub mod error;
pub mod fields;
pub mod fmt;
pub mod grammar;
pub mod links;
pub mod logging;
pub mod models;
pub mod payments;
pub mod recurrence;
pub mod settings;
pub mod store;
pub mod timeline;

pub use error::{NoteError, Result};
pub use models::{EntryKind, Note, NoteFlags, Timeline, TimelineEntry};
