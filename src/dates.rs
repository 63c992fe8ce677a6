use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};

/// Canonical short format for dates written into notes.
pub const NOTE_DATE_FORMAT: &str = "%d/%m/%Y";

const FALLBACK_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y", "%Y-%m-%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

// ---------------------------------------------------------------------------
// Date tokens
// ---------------------------------------------------------------------------

/// Parse a short date token as written on an event line.
///
/// A `D/M/Y` split is tried first; anything that does not land on a real
/// calendar date falls through to the fixed format list. Returns `None`
/// rather than an error so that the event is kept, undated.
pub fn parse_date_token(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(date) = parse_dmy_parts(raw) {
        return Some(date);
    }
    FALLBACK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn parse_dmy_parts(raw: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    if !parts
        .iter()
        .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }
    let d: u32 = parts[0].parse().ok()?;
    let m: u32 = parts[1].parse().ok()?;
    let mut y: i32 = parts[2].parse().ok()?;
    if parts[2].len() <= 2 {
        y += 2000;
    }
    NaiveDate::from_ymd_opt(y, m, d)
}

/// General-purpose parser for `event_date:` fields, which are usually ISO
/// dates or datetimes but may also be hand-written short dates.
pub fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt.date());
    }
    if let Some(date) = raw
        .get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
    {
        return Some(date);
    }
    parse_date_token(raw)
}

pub fn format_note_date(date: NaiveDate) -> String {
    date.format(NOTE_DATE_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// Calendar arithmetic
// ---------------------------------------------------------------------------

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
        Some(first_next) => (first_next - Duration::days(1)).day(),
        None => 28,
    }
}

/// Build a date, pulling `day` back to the last day of the month when the
/// month is too short (Jan 31 -> Feb 28/29, Feb 29 -> Feb 28).
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let day = day.min(days_in_month(year, month)).max(1);
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub fn last_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Shift a date by whole months, clamping the day to the target month.
pub fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = date.year() * 12 + date.month() as i32 - 1 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    clamped_date(year, month, date.day())
}

/// Whole years, months and days between two dates, order-insensitive.
pub fn calendar_span(start: NaiveDate, end: NaiveDate) -> (u32, u32, u32) {
    let (start, end) = if end < start { (end, start) } else { (start, end) };
    let mut total =
        (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    let mut anchor = shift_months(start, total).unwrap_or(start);
    if anchor > end {
        total -= 1;
        anchor = shift_months(start, total).unwrap_or(start);
    }
    let days = (end - anchor).num_days().max(0);
    ((total / 12) as u32, (total % 12) as u32, days as u32)
}
