use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A note as handed over by the storage collaborator. Read-only to the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub created_datetime: String,
}

impl Note {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            created_datetime: String::new(),
        }
    }
}

/// What produced a timeline entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryKind {
    /// Written inline in the timeline note, at this content-line index.
    Authored { line_index: usize },
    /// Pulled in from an event note through `meta::linked_from_events`.
    Linked {
        note_id: String,
        notes: Option<String>,
    },
    Today,
    /// Sum of all real dollar amounts, already formatted.
    Total { label: String },
    /// Span between the first and last dated entry of a closed timeline.
    Duration { label: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub kind: EntryKind,
    pub text: String,
    pub date: Option<NaiveDate>,
    /// Date text as written, before parsing.
    pub date_str: String,
    pub dollar_amount: f64,
    pub link: Option<String>,
    pub days_from_previous: Option<i64>,
    pub days_from_start: Option<i64>,
}

impl TimelineEntry {
    pub(crate) fn new(kind: EntryKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            date: None,
            date_str: String::new(),
            dollar_amount: 0.0,
            link: None,
            days_from_previous: None,
            days_from_start: None,
        }
    }

    /// Content-line index for authored entries; `None` for anything that
    /// cannot be edited by splicing the owning note's lines.
    pub fn line_index(&self) -> Option<usize> {
        match self.kind {
            EntryKind::Authored { line_index } => Some(line_index),
            _ => None,
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(
            self.kind,
            EntryKind::Today | EntryKind::Total { .. } | EntryKind::Duration { .. }
        )
    }

    pub fn is_linked(&self) -> bool {
        matches!(self.kind, EntryKind::Linked { .. })
    }

    pub fn linked_note_id(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Linked { note_id, .. } => Some(note_id),
            _ => None,
        }
    }

    pub fn notes(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Linked { notes, .. } => notes.as_deref(),
            _ => None,
        }
    }
}

/// Flags carried by `meta::` tag lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteFlags {
    pub timeline: bool,
    pub flagged: bool,
    pub tracked: bool,
}

/// A presentation-ready timeline. Rebuilt from the note on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub note_id: String,
    pub title: String,
    pub is_closed: bool,
    pub flags: NoteFlags,
    pub events: Vec<TimelineEntry>,
    pub total_dollar_amount: f64,
}

impl Timeline {
    pub fn markers(&self) -> impl Iterator<Item = &TimelineEntry> {
        self.events.iter().filter(|e| e.is_marker())
    }

    pub fn real_events(&self) -> impl Iterator<Item = &TimelineEntry> {
        self.events.iter().filter(|e| !e.is_marker())
    }
}
