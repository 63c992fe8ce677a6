//! Edits to a timeline note's text. Each returns new content; the note
//! itself is never touched. Events are addressed by the content-line index
//! the parser hands out, so title (0) and virtual entries are not editable.

use crate::dates::{format_note_date, parse_date_token};
use crate::error::{NoteError, Result};
use crate::grammar::{content_lines, is_closed_line, CLOSED_MARKER};

/// Render an event line. Parsable dates are normalized to `DD/MM/YYYY`.
pub fn format_event_line(text: &str, date: &str, link: Option<&str>) -> String {
    let text = text.trim();
    let date = date.trim();
    let date = match parse_date_token(date) {
        Some(parsed) => format_note_date(parsed),
        None => date.to_string(),
    };
    match link.map(str::trim).filter(|l| !l.is_empty()) {
        Some(link) if !date.is_empty() => format!("{text} : {date} : {link}"),
        Some(link) => format!("{text} : ? : {link}"),
        None if !date.is_empty() => format!("{text} : {date}"),
        None => text.to_string(),
    }
}

fn split_lines(content: &str) -> (Vec<String>, bool) {
    let lines = content.lines().map(str::to_string).collect();
    (lines, content.ends_with('\n'))
}

fn join_lines(lines: &[String], trailing_newline: bool) -> String {
    let mut out = lines.join("\n");
    if trailing_newline {
        out.push('\n');
    }
    out
}

/// Raw line number of an editable event line.
fn event_row(content: &str, line_index: usize) -> Result<usize> {
    let rows = content_lines(content);
    if line_index == 0 {
        return Err(NoteError::ReadOnlyLine(line_index));
    }
    rows.get(line_index)
        .map(|(row, _)| *row)
        .ok_or(NoteError::LineOutOfRange {
            line: line_index,
            len: rows.len(),
        })
}

/// Insert an event after the last content line, ahead of any trailing
/// `Closed`/`meta::` lines.
pub fn append_event(content: &str, text: &str, date: &str, link: Option<&str>) -> Result<String> {
    let rows = content_lines(content);
    let Some(&(last_row, _)) = rows.last() else {
        return Err(NoteError::MissingTitle);
    };
    let (mut lines, trailing) = split_lines(content);
    lines.insert(last_row + 1, format_event_line(text, date, link));
    Ok(join_lines(&lines, trailing))
}

pub fn replace_event(
    content: &str,
    line_index: usize,
    text: &str,
    date: &str,
    link: Option<&str>,
) -> Result<String> {
    let row = event_row(content, line_index)?;
    let (mut lines, trailing) = split_lines(content);
    lines[row] = format_event_line(text, date, link);
    Ok(join_lines(&lines, trailing))
}

pub fn delete_event(content: &str, line_index: usize) -> Result<String> {
    let row = event_row(content, line_index)?;
    let (mut lines, trailing) = split_lines(content);
    lines.remove(row);
    Ok(join_lines(&lines, trailing))
}

/// Add or remove the `Closed` line. A no-op when already in that state.
pub fn set_closed(content: &str, closed: bool) -> String {
    let (lines, trailing) = split_lines(content);
    let is_closed = lines.iter().any(|l| is_closed_line(l));
    if closed == is_closed {
        return content.to_string();
    }
    let mut lines: Vec<String> = lines.into_iter().filter(|l| !is_closed_line(l)).collect();
    if closed {
        lines.push(CLOSED_MARKER.to_string());
    }
    join_lines(&lines, trailing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parse_note;

    const NOTE: &str = "Trip\nFlight : 01/03/2024\n\nHotel : 02/03/2024\nmeta::timeline\n";

    #[test]
    fn test_format_event_line() {
        assert_eq!(format_event_line("Flight", "1/3/2024", None), "Flight : 01/03/2024");
        assert_eq!(format_event_line("Flight", "2024-03-01", Some("https://x")), "Flight : 01/03/2024 : https://x");
        assert_eq!(format_event_line("Idea", "", None), "Idea");
        assert_eq!(format_event_line("Visa", "soon", None), "Visa : soon");
    }

    #[test]
    fn test_append_goes_before_meta() {
        let updated = append_event(NOTE, "Taxi $30", "03/03/2024", None).unwrap();
        assert_eq!(
            updated,
            "Trip\nFlight : 01/03/2024\n\nHotel : 02/03/2024\nTaxi $30 : 03/03/2024\nmeta::timeline\n"
        );
        let parsed = parse_note(&updated);
        assert_eq!(parsed.events.len(), 3);
        assert_eq!(parsed.total_dollar_amount, 30.0);
    }

    #[test]
    fn test_append_to_empty_note_fails() {
        assert!(matches!(append_event("meta::timeline", "x", "", None), Err(NoteError::MissingTitle)));
    }

    #[test]
    fn test_replace_by_parser_line_index() {
        let hotel = parse_note(NOTE).events[1].line_index().unwrap();
        let updated = replace_event(NOTE, hotel, "Hostel", "04/03/2024", None).unwrap();
        assert!(updated.contains("Hostel : 04/03/2024"));
        assert!(!updated.contains("Hotel"));
        assert!(updated.ends_with("meta::timeline\n"));
    }

    #[test]
    fn test_delete_by_parser_line_index() {
        let flight = parse_note(NOTE).events[0].line_index().unwrap();
        let updated = delete_event(NOTE, flight).unwrap();
        assert_eq!(updated, "Trip\n\nHotel : 02/03/2024\nmeta::timeline\n");
    }

    #[test]
    fn test_title_and_out_of_range_rejected() {
        assert!(matches!(delete_event(NOTE, 0), Err(NoteError::ReadOnlyLine(0))));
        assert!(matches!(
            delete_event(NOTE, 3),
            Err(NoteError::LineOutOfRange { line: 3, len: 3 })
        ));
    }

    #[test]
    fn test_set_closed_toggles() {
        let closed = set_closed(NOTE, true);
        assert!(parse_note(&closed).is_closed);
        assert_eq!(set_closed(&closed, true), closed);
        let reopened = set_closed(&closed, false);
        assert!(!parse_note(&reopened).is_closed);
        assert_eq!(reopened, NOTE);
    }
}
