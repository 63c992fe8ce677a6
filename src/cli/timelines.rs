use colored::Colorize;
use comfy_table::{Cell, Table};

use notedash::dates::format_note_date;
use notedash::error::{NoteError, Result};
use notedash::fmt::{day_delta, money};
use notedash::links::NoteIndex;
use notedash::models::{EntryKind, TimelineEntry};
use notedash::timeline::{build_timeline, list_timelines};

use super::{open_store, today};

pub fn list(notes: Option<&str>) -> Result<()> {
    let store = open_store(notes)?;
    let rows = list_timelines(store.notes(), today());

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Events", "Next", "Total", "State"]);
    for row in &rows {
        let title = if row.flagged {
            row.title.yellow().bold().to_string()
        } else {
            row.title.clone()
        };
        let state = if row.is_closed {
            "closed".dimmed().to_string()
        } else {
            "open".green().to_string()
        };
        table.add_row(vec![
            Cell::new(&row.note_id),
            Cell::new(title),
            Cell::new(row.event_count),
            Cell::new(row.next_event.map(format_note_date).unwrap_or_default()),
            Cell::new(if row.total_dollar_amount > 0.0 {
                money(row.total_dollar_amount)
            } else {
                String::new()
            }),
            Cell::new(state),
        ]);
    }
    println!("Timelines\n{table}");
    Ok(())
}

fn line_cell(entry: &TimelineEntry) -> String {
    match &entry.kind {
        EntryKind::Authored { line_index } => line_index.to_string(),
        EntryKind::Linked { note_id, .. } => format!("-> {note_id}"),
        _ => String::new(),
    }
}

fn text_cell(entry: &TimelineEntry) -> String {
    match &entry.kind {
        EntryKind::Today => entry.text.cyan().bold().to_string(),
        EntryKind::Total { label } => format!("{} {}", entry.text.bold(), label),
        EntryKind::Duration { label } => format!("{} {}", entry.text.bold(), label),
        EntryKind::Linked { .. } => entry.text.italic().to_string(),
        EntryKind::Authored { .. } => entry.text.clone(),
    }
}

pub fn show(notes: Option<&str>, id: &str) -> Result<()> {
    let store = open_store(notes)?;
    let note = store
        .get(id)
        .ok_or_else(|| NoteError::UnknownNote(id.to_string()))?;
    let index = NoteIndex::new(store.notes());
    let timeline = build_timeline(note, &index, today());

    if !(timeline.flags.timeline || timeline.flags.flagged) {
        return Err(NoteError::NotATimeline(id.to_string()));
    }

    let mut table = Table::new();
    table.set_header(vec!["Line", "Event", "Date", "Prev", "Start", "Amount", "Link"]);
    for entry in &timeline.events {
        let date = match entry.date {
            Some(d) => format_note_date(d),
            None => entry.date_str.clone(),
        };
        table.add_row(vec![
            Cell::new(line_cell(entry)),
            Cell::new(text_cell(entry)),
            Cell::new(date),
            Cell::new(entry.days_from_previous.map(day_delta).unwrap_or_default()),
            Cell::new(entry.days_from_start.map(day_delta).unwrap_or_default()),
            Cell::new(if entry.dollar_amount > 0.0 && !entry.is_marker() {
                money(entry.dollar_amount)
            } else {
                String::new()
            }),
            Cell::new(entry.link.clone().unwrap_or_default()),
        ]);
    }

    let heading = if timeline.is_closed {
        format!("{} (closed)", timeline.title)
    } else {
        timeline.title.clone()
    };
    println!("{}\n{table}", heading.bold());
    Ok(())
}
