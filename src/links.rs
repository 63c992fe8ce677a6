use std::collections::HashMap;

use crate::amounts::extract_dollars;
use crate::dates::parse_loose_date;
use crate::fields::parse_event_fields;
use crate::models::{EntryKind, Note, TimelineEntry};

/// Id lookup over a note snapshot, built once per call.
pub struct NoteIndex<'a> {
    by_id: HashMap<&'a str, &'a Note>,
}

impl<'a> NoteIndex<'a> {
    pub fn new(notes: &'a [Note]) -> Self {
        let by_id = notes.iter().map(|n| (n.id.as_str(), n)).collect();
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a Note> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Display text for a linked event: the description, with the `event_$`
/// price appended so dollar extraction picks it up.
fn display_text(description: &str, price: Option<&str>) -> String {
    match price.map(|p| p.trim().trim_start_matches('$').trim()) {
        Some(p) if !p.is_empty() => format!("{description} ${p}"),
        _ => description.to_string(),
    }
}

/// Turn one event note into a linked timeline entry. `None` when the note
/// does not carry the event fields.
pub fn linked_entry(note: &Note) -> Option<TimelineEntry> {
    let fields = parse_event_fields(&note.content);
    let description = fields.description.as_deref().filter(|d| !d.is_empty())?;
    let text = display_text(description, fields.price.as_deref());

    let mut entry = TimelineEntry::new(
        EntryKind::Linked {
            note_id: note.id.clone(),
            notes: fields.notes.clone(),
        },
        text,
    );
    entry.dollar_amount = extract_dollars(&entry.text);
    if let Some(raw) = fields.date.as_deref() {
        entry.date = parse_loose_date(raw);
        entry.date_str = raw.to_string();
    }
    Some(entry)
}

/// Resolve referenced event ids against the snapshot. Unknown ids and notes
/// without event fields are skipped.
pub fn resolve_linked_events(ids: &[String], index: &NoteIndex<'_>) -> Vec<TimelineEntry> {
    let mut entries = Vec::with_capacity(ids.len());
    for id in ids {
        let Some(note) = index.get(id) else {
            log::warn!("event=linked_event_missing id={id}");
            continue;
        };
        match linked_entry(note) {
            Some(entry) => entries.push(entry),
            None => log::warn!("event=linked_event_incomplete id={id}"),
        }
    }
    entries
}
