pub mod event;
pub mod init;
pub mod payments;
pub mod status;
pub mod timelines;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use notedash::error::{NoteError, Result};
use notedash::settings::{load_settings, shellexpand_path};
use notedash::store::NoteStore;

/// Notes file or directory: `--notes` wins over settings.
pub(crate) fn notes_path(notes: Option<&str>) -> PathBuf {
    match notes {
        Some(path) => PathBuf::from(shellexpand_path(path)),
        None => PathBuf::from(shellexpand_path(&load_settings().notes_path)),
    }
}

pub(crate) fn open_store(notes: Option<&str>) -> Result<NoteStore> {
    NoteStore::open(&notes_path(notes))
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// `YYYY-MM` into `(year, month)`.
pub(crate) fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let invalid = || NoteError::InvalidMonth(raw.to_string());
    let (y, m) = raw.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = y.parse().map_err(|_| invalid())?;
    let month: u32 = m.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

#[derive(Parser)]
#[command(name = "notedash", about = "Timelines and recurring payments from plain-text notes.")]
pub struct Cli {
    /// Notes JSON file or directory of .txt/.md notes (overrides settings)
    #[arg(long, global = true)]
    pub notes: Option<String>,
    /// Log level: trace, debug, info, warn, error, off
    #[arg(long = "log-level", global = true, default_value = notedash::logging::DEFAULT_LEVEL)]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose where notes are read from.
    Init {
        /// Notes JSON file or directory (default: ~/Documents/notedash/notes.json)
        #[arg(long = "notes-path")]
        notes_path: Option<String>,
    },
    /// Show the notes source and summary counts.
    Status,
    /// List every timeline note.
    Timelines,
    /// Show one timeline with its markers and day deltas.
    Timeline {
        /// Note id
        id: String,
    },
    /// Show recurring payment occurrences for a month.
    Payments {
        /// Month: YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
        /// Show occurrences before today instead of upcoming ones
        #[arg(long)]
        past: bool,
    },
    /// Report recurring payments that cannot be scheduled.
    Validate,
    /// List purchase-tagged event notes with their total.
    Purchases,
    /// Edit events in a timeline note.
    Event {
        #[command(subcommand)]
        command: EventCommands,
    },
    /// Print shell completions.
    Completions {
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum EventCommands {
    /// Append an event line.
    Add {
        /// Timeline note id
        id: String,
        /// Event text
        text: String,
        /// Event date, DD/MM/YYYY
        #[arg(long)]
        date: Option<String>,
        /// Link to attach
        #[arg(long)]
        link: Option<String>,
    },
    /// Replace the event on a line (line numbers from `notedash timeline`).
    Edit {
        id: String,
        line: usize,
        text: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        link: Option<String>,
    },
    /// Delete the event on a line.
    Delete {
        id: String,
        line: usize,
    },
    /// Mark a timeline closed.
    Close {
        id: String,
    },
    /// Remove the closed mark from a timeline.
    Reopen {
        id: String,
    },
}
