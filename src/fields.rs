//! `event_*:` field lines used by standalone event notes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::grammar::is_meta_line;

pub const DESCRIPTION_FIELD: &str = "event_description:";
pub const DATE_FIELD: &str = "event_date:";
pub const NOTES_FIELD: &str = "event_notes:";
pub const PRICE_FIELD: &str = "event_$:";
pub const TAGS_FIELD: &str = "event_tags:";
pub const RECURRING_TYPE_FIELD: &str = "event_recurring_type:";

static FIELD_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^event_[A-Za-z0-9_$]+:").expect("field pattern compiles"));

/// Raw field values of an event note. Nothing is validated here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFields {
    pub description: Option<String>,
    pub date: Option<String>,
    pub notes: Option<String>,
    pub price: Option<String>,
    pub tags: Vec<String>,
    pub recurring_type: Option<String>,
}

impl EventFields {
    /// An event note needs at least a description.
    pub fn is_event(&self) -> bool {
        self.description.as_deref().is_some_and(|d| !d.is_empty())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

fn is_field_line(line: &str) -> bool {
    FIELD_LINE_RE.is_match(line.trim_start())
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub fn parse_event_fields(content: &str) -> EventFields {
    let mut fields = EventFields::default();
    let mut notes_lines: Option<Vec<&str>> = None;

    for line in content.lines() {
        let trimmed = line.trim();
        if let Some(collected) = notes_lines.as_mut() {
            if !is_field_line(trimmed) && !is_meta_line(trimmed) {
                collected.push(line.trim_end());
                continue;
            }
        }
        if let Some(value) = trimmed.strip_prefix(NOTES_FIELD) {
            notes_lines = Some(vec![value.trim()]);
            continue;
        }
        if let Some(collected) = notes_lines.take() {
            fields.notes = join_notes(collected);
        }
        if let Some(value) = trimmed.strip_prefix(DESCRIPTION_FIELD) {
            fields.description = non_empty(value);
        } else if let Some(value) = trimmed.strip_prefix(DATE_FIELD) {
            fields.date = non_empty(value);
        } else if let Some(value) = trimmed.strip_prefix(PRICE_FIELD) {
            fields.price = non_empty(value);
        } else if let Some(value) = trimmed.strip_prefix(TAGS_FIELD) {
            fields.tags = value
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        } else if let Some(value) = trimmed.strip_prefix(RECURRING_TYPE_FIELD) {
            fields.recurring_type = non_empty(value).map(|v| v.to_lowercase());
        }
    }
    if let Some(collected) = notes_lines {
        fields.notes = join_notes(collected);
    }
    fields
}

fn join_notes(lines: Vec<&str>) -> Option<String> {
    let joined = lines.join("\n");
    non_empty(&joined)
}
