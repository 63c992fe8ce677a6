//! Timeline assembly: ordering, virtual markers and day deltas.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::dates::{calendar_span, format_note_date};
use crate::fmt::{money, span_label};
use crate::grammar::{note_flags, parse_note, ParsedNote};
use crate::links::{resolve_linked_events, NoteIndex};
use crate::models::{EntryKind, Note, Timeline, TimelineEntry};

pub const TODAY_TEXT: &str = "Today";
pub const TOTAL_TEXT: &str = "Total";
pub const DURATION_TEXT: &str = "Total Duration";

/// A parsed note with its linked events resolved, not yet ordered or
/// marked. Independent of "today", so it can be cached.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineDraft {
    pub note_id: String,
    pub parsed: ParsedNote,
    pub linked: Vec<TimelineEntry>,
}

pub fn draft(note: &Note, index: &NoteIndex<'_>) -> TimelineDraft {
    let parsed = parse_note(&note.content);
    let linked = resolve_linked_events(&parsed.linked_event_ids, index);
    TimelineDraft {
        note_id: note.id.clone(),
        parsed,
        linked,
    }
}

/// Dated entries ascending, undated last. `sort_by` is stable, so ties keep
/// input order.
fn by_date(a: &TimelineEntry, b: &TimelineEntry) -> Ordering {
    match (a.date, b.date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn today_marker(today: NaiveDate) -> TimelineEntry {
    let mut entry = TimelineEntry::new(EntryKind::Today, TODAY_TEXT);
    entry.date = Some(today);
    entry.date_str = format_note_date(today);
    entry
}

fn duration_marker(events: &[TimelineEntry]) -> Option<TimelineEntry> {
    let mut dates = events.iter().filter_map(|e| e.date);
    let first = dates.next()?;
    let last = dates.last().unwrap_or(first);
    let (y, m, d) = calendar_span(first, last);
    let label = span_label(y, m, d);
    Some(TimelineEntry::new(EntryKind::Duration { label }, DURATION_TEXT))
}

fn fill_deltas(entries: &mut [TimelineEntry]) {
    let mut first: Option<NaiveDate> = None;
    let mut previous: Option<NaiveDate> = None;
    for entry in entries.iter_mut() {
        let Some(date) = entry.date else { continue };
        entry.days_from_previous = previous.map(|p| (date - p).num_days());
        entry.days_from_start = Some(first.map_or(0, |f| (date - f).num_days()));
        first.get_or_insert(date);
        previous = Some(date);
    }
}

/// Order a draft's events and splice in the Today/Duration/Total markers.
pub fn assemble(draft: &TimelineDraft, today: NaiveDate) -> Timeline {
    let parsed = &draft.parsed;
    let mut events: Vec<TimelineEntry> = parsed
        .events
        .iter()
        .chain(draft.linked.iter())
        .cloned()
        .collect();
    events.sort_by(by_date);

    let total: f64 = events.iter().map(|e| e.dollar_amount).sum();

    if parsed.is_closed {
        if let Some(marker) = duration_marker(&events) {
            events.push(marker);
        }
    } else {
        let split = events
            .iter()
            .position(|e| e.date.map_or(true, |d| d >= today))
            .unwrap_or(events.len());
        events.insert(split, today_marker(today));
    }

    if total > 0.0 {
        let label = money(total);
        events.push(TimelineEntry::new(EntryKind::Total { label }, TOTAL_TEXT));
    }

    fill_deltas(&mut events);

    Timeline {
        note_id: draft.note_id.clone(),
        title: parsed.title.clone(),
        is_closed: parsed.is_closed,
        flags: parsed.flags,
        events,
        total_dollar_amount: total,
    }
}

/// Parse, resolve and assemble a single note against a snapshot.
pub fn build_timeline(note: &Note, index: &NoteIndex<'_>, today: NaiveDate) -> Timeline {
    assemble(&draft(note, index), today)
}

/// Look up and build one note's timeline from a snapshot.
pub fn find_timeline(notes: &[Note], note_id: &str, today: NaiveDate) -> Option<Timeline> {
    let index = NoteIndex::new(notes);
    let note = index.get(note_id)?;
    Some(build_timeline(note, &index, today))
}

/// One row of the timeline overview.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineSummary {
    pub note_id: String,
    pub title: String,
    pub event_count: usize,
    pub total_dollar_amount: f64,
    pub is_closed: bool,
    pub flagged: bool,
    pub tracked: bool,
    pub next_event: Option<NaiveDate>,
}

/// Every timeline-tagged note, flagged first, then by title.
pub fn list_timelines(notes: &[Note], today: NaiveDate) -> Vec<TimelineSummary> {
    let index = NoteIndex::new(notes);
    let mut rows: Vec<TimelineSummary> = notes
        .iter()
        .filter(|n| {
            let flags = note_flags(&n.content);
            flags.timeline || flags.flagged
        })
        .map(|note| {
            let timeline = build_timeline(note, &index, today);
            let next_event = timeline
                .real_events()
                .filter_map(|e| e.date)
                .find(|d| *d >= today);
            TimelineSummary {
                note_id: note.id.clone(),
                title: timeline.title.clone(),
                event_count: timeline.real_events().count(),
                total_dollar_amount: timeline.total_dollar_amount,
                is_closed: timeline.is_closed,
                flagged: timeline.flags.flagged,
                tracked: timeline.flags.tracked,
                next_event,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.flagged
            .cmp(&a.flagged)
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });
    rows
}
