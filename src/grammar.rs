//! Line grammar for timeline notes.
//!
//! A timeline note is a title line followed by event lines of the form
//! `text : date` or `text : date : link`, plus `Closed` and `meta::` lines
//! anywhere. A bad line never stops the rest of the note from parsing.

use std::collections::HashSet;

use crate::amounts::extract_dollars;
use crate::dates::parse_date_token;
use crate::models::{EntryKind, NoteFlags, TimelineEntry};

pub const META_PREFIX: &str = "meta::";
pub const TIMELINE_TAG: &str = "meta::timeline";
pub const FLAGGED_TIMELINE_TAG: &str = "meta::flagged_timeline";
pub const TRACKED_TAG: &str = "meta::tracked";
pub const LINKED_EVENTS_PREFIX: &str = "meta::linked_from_events::";
pub const CLOSED_MARKER: &str = "Closed";

/// Shape of a single event line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineShape<'a> {
    Dated {
        text: &'a str,
        date_str: &'a str,
        link: &'a str,
    },
    DatedNoLink {
        text: &'a str,
        date_str: &'a str,
    },
    Untimed {
        text: &'a str,
    },
    /// Nothing usable as event text (e.g. `: 01/03/2024`).
    Malformed,
}

fn looks_like_link(s: &str) -> bool {
    s.contains("://") || s.starts_with("www.") || s.starts_with('/')
}

/// Classify one event line.
///
/// Tried in order: the rightmost `:`-delimited segment that reads as a date
/// (so event text may contain colons and links may contain `://`); then a
/// ` : `-separated split with an optional trailing link; then the last bare
/// colon with text on both sides; finally the whole line as untimed text.
pub fn classify_line(line: &str) -> LineShape<'_> {
    let line = line.trim();
    let colons: Vec<usize> = line.match_indices(':').map(|(i, _)| i).collect();
    let Some(&first) = colons.first() else {
        return LineShape::Untimed { text: line };
    };
    if line[..first].trim().is_empty() {
        return LineShape::Malformed;
    }

    for (k, &start) in colons.iter().enumerate().rev() {
        let end = colons.get(k + 1).copied().unwrap_or(line.len());
        let date_str = line[start + 1..end].trim();
        if parse_date_token(date_str).is_none() {
            continue;
        }
        let text = line[..start].trim();
        let link = if end < line.len() { line[end + 1..].trim() } else { "" };
        return if link.is_empty() {
            LineShape::DatedNoLink { text, date_str }
        } else {
            LineShape::Dated { text, date_str, link }
        };
    }

    let spaced: Vec<usize> = line.match_indices(" : ").map(|(i, _)| i).collect();
    if let Some(&last) = spaced.last() {
        let tail = line[last + 3..].trim();
        if spaced.len() >= 2 && looks_like_link(tail) {
            let prev = spaced[spaced.len() - 2];
            let text = line[..prev].trim();
            let date_str = line[prev + 3..last].trim();
            if !text.is_empty() && !date_str.is_empty() {
                return LineShape::Dated { text, date_str, link: tail };
            }
        }
        let text = line[..last].trim();
        if !text.is_empty() && !tail.is_empty() {
            return LineShape::DatedNoLink { text, date_str: tail };
        }
    }

    for &pos in colons.iter().rev() {
        let text = line[..pos].trim();
        let rest = line[pos + 1..].trim();
        if !text.is_empty() && !rest.is_empty() && !looks_like_link(rest) {
            return LineShape::DatedNoLink { text, date_str: rest };
        }
    }

    LineShape::Untimed { text: line }
}

/// Result of parsing one note's text, before links are resolved and markers
/// are inserted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedNote {
    pub title: String,
    pub is_closed: bool,
    pub flags: NoteFlags,
    pub events: Vec<TimelineEntry>,
    /// Ids from every `meta::linked_from_events::` line, first-seen order.
    pub linked_event_ids: Vec<String>,
    pub total_dollar_amount: f64,
}

fn has_tag(line: &str, tag: &str) -> bool {
    line == tag || line.strip_prefix(tag).is_some_and(|rest| rest.starts_with("::"))
}

pub fn is_meta_line(line: &str) -> bool {
    line.trim_start().starts_with(META_PREFIX)
}

pub fn is_closed_line(line: &str) -> bool {
    line.trim() == CLOSED_MARKER
}

/// Lines that carry a title or events, with their raw line numbers.
/// Index 0 of the result is the title.
pub fn content_lines(content: &str) -> Vec<(usize, &str)> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && !is_closed_line(line) && !is_meta_line(line))
        .collect()
}

pub fn note_flags(content: &str) -> NoteFlags {
    let mut flags = NoteFlags::default();
    for line in content.lines().map(str::trim) {
        flags.timeline |= has_tag(line, TIMELINE_TAG);
        flags.flagged |= has_tag(line, FLAGGED_TIMELINE_TAG);
        flags.tracked |= has_tag(line, TRACKED_TAG);
    }
    flags
}

/// Union of ids across all `meta::linked_from_events::` lines.
pub fn linked_event_ids(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for line in content.lines() {
        let Some(payload) = line.trim().strip_prefix(LINKED_EVENTS_PREFIX) else {
            continue;
        };
        for id in payload.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            if seen.insert(id.to_string()) {
                ids.push(id.to_string());
            }
        }
    }
    ids
}

fn event_from_shape(shape: LineShape<'_>, line_index: usize) -> Option<TimelineEntry> {
    let (text, date_str, link) = match shape {
        LineShape::Dated { text, date_str, link } => (text, date_str, Some(link)),
        LineShape::DatedNoLink { text, date_str } => (text, date_str, None),
        LineShape::Untimed { text } => (text, "", None),
        LineShape::Malformed => return None,
    };
    let mut entry = TimelineEntry::new(EntryKind::Authored { line_index }, text);
    entry.date = parse_date_token(date_str);
    entry.date_str = date_str.to_string();
    entry.dollar_amount = extract_dollars(text);
    entry.link = link.map(str::to_string);
    Some(entry)
}

/// Parse a note's full text into title, closed flag and authored events.
pub fn parse_note(content: &str) -> ParsedNote {
    let is_closed = content.lines().any(is_closed_line);
    let lines = content_lines(content);
    let title = lines
        .first()
        .map(|(_, line)| line.trim().to_string())
        .unwrap_or_default();

    let mut events = Vec::new();
    for (line_index, (_, line)) in lines.iter().enumerate().skip(1) {
        match event_from_shape(classify_line(line), line_index) {
            Some(entry) => events.push(entry),
            None => log::debug!("event=line_skipped line_index={line_index}"),
        }
    }
    let total_dollar_amount = events.iter().map(|e| e.dollar_amount).sum();

    ParsedNote {
        title,
        is_closed,
        flags: note_flags(content),
        events,
        linked_event_ids: linked_event_ids(content),
        total_dollar_amount,
    }
}
