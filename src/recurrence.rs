//! Recurrence rules for scheduled payments and their expansion into dates.
//!
//! Expansion is plain arithmetic over an explicit [`OccurrenceWindow`]: the
//! first occurrence on or after `max(window.start, anchor)` is computed
//! directly, then stepped forward until the window ends.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::dates::{clamped_date, first_of_month, last_of_month, next_month, parse_loose_date};
use crate::fields::EventFields;

static BIWEEKLY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bbiweekly\s*:\s*([a-z]*)").expect("biweekly pattern compiles")
});
static WEEKLY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bweekly\s*:\s*([a-z]+(?:\s*,\s*[a-z]+)*)?").expect("weekly pattern compiles")
});
static EVERY_COLON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bevery\s*:\s*(\S*)").expect("every pattern compiles"));
static EVERY_DAYS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bevery\s*(-?\d+)\s*days?\b").expect("every-days pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceRule {
    None,
    Monthly { anchor: NaiveDate },
    /// Weekdays in Monday-first order, no duplicates.
    Weekly { days: Vec<Weekday> },
    Biweekly { anchor: NaiveDate, day: Weekday },
    EveryNDays { anchor: NaiveDate, n: u32 },
    Yearly { anchor: NaiveDate },
}

impl RecurrenceRule {
    pub fn label(&self) -> String {
        match self {
            Self::None => "None".to_string(),
            Self::Monthly { .. } => "Monthly".to_string(),
            Self::Weekly { days } => {
                let names: Vec<&str> = days.iter().map(|d| weekday_abbrev(*d)).collect();
                format!("Weekly ({})", names.join(", "))
            }
            Self::Biweekly { day, .. } => format!("Every 2 weeks ({})", weekday_abbrev(*day)),
            Self::EveryNDays { n: 1, .. } => "Daily".to_string(),
            Self::EveryNDays { n, .. } => format!("Every {n} days"),
            Self::Yearly { .. } => "Yearly".to_string(),
        }
    }
}

pub fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Case-insensitive weekday name, full or abbreviated.
pub fn parse_weekday(raw: &str) -> Option<Weekday> {
    match raw.trim().to_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tues" | "tuesday" => Some(Weekday::Tue),
        "wed" | "weds" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thur" | "thurs" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Reasons a payment's cadence could not be understood.
pub type CadenceProblems = Vec<String>;

fn anchor_for(fields: &EventFields, cadence: &str) -> Result<NaiveDate, CadenceProblems> {
    match fields.date.as_deref() {
        None => Err(vec![format!("{cadence} payments require a start date")]),
        Some(raw) => parse_loose_date(raw).ok_or_else(|| vec![format!("Invalid start date: {raw}")]),
    }
}

fn classify_biweekly(fields: &EventFields, day_raw: &str) -> Result<RecurrenceRule, CadenceProblems> {
    let mut problems = Vec::new();
    let day = parse_weekday(day_raw);
    if day.is_none() {
        problems.push(format!("Invalid weekday for biweekly payment: {day_raw:?}"));
    }
    let anchor = anchor_for(fields, "Biweekly").map_err(|p| problems.extend(p)).ok();
    match (anchor, day) {
        (Some(anchor), Some(day)) => Ok(RecurrenceRule::Biweekly { anchor, day }),
        _ => Err(problems),
    }
}

fn classify_every(fields: &EventFields, n_raw: &str) -> Result<RecurrenceRule, CadenceProblems> {
    let mut problems = Vec::new();
    let n = n_raw.parse::<i64>().ok().filter(|n| *n > 0 && *n <= u32::MAX as i64);
    if n.is_none() {
        problems.push(format!("Invalid interval: {n_raw:?} (must be a positive number of days)"));
    }
    let anchor = anchor_for(fields, "Every-N-days").map_err(|p| problems.extend(p)).ok();
    if let (Some(anchor), Some(days)) = (anchor, n) {
        if anchor.checked_add_signed(Duration::days(days)).is_none() {
            problems.push(format!("Invalid interval: {n_raw:?} (runs past the last supported date)"));
            return Err(problems);
        }
    }
    match (anchor, n) {
        (Some(anchor), Some(n)) => Ok(RecurrenceRule::EveryNDays { anchor, n: n as u32 }),
        _ => Err(problems),
    }
}

fn classify_weekly(list: &str) -> Result<RecurrenceRule, CadenceProblems> {
    let mut days: Vec<Weekday> = list.split(',').filter_map(parse_weekday).collect();
    days.sort_by_key(|d| d.num_days_from_monday());
    days.dedup();
    if days.is_empty() {
        return Err(vec!["No valid weekdays in weekly schedule".to_string()]);
    }
    Ok(RecurrenceRule::Weekly { days })
}

/// Work out a payment's cadence from its fields.
///
/// Precedence: the `event_notes` sub-grammar (`biweekly:`, `every:`,
/// `every N days`, `weekly:`), then `event_recurring_type`, then a bare
/// `event_date`, which means monthly on that day. An explicit
/// `event_recurring_type: none` without a date is [`RecurrenceRule::None`].
pub fn classify(fields: &EventFields) -> Result<RecurrenceRule, CadenceProblems> {
    let notes = fields.notes.as_deref().unwrap_or("");

    if let Some(caps) = BIWEEKLY_RE.captures(notes) {
        return classify_biweekly(fields, &caps[1]);
    }
    if let Some(caps) = EVERY_DAYS_RE.captures(notes) {
        return classify_every(fields, &caps[1]);
    }
    if let Some(caps) = EVERY_COLON_RE.captures(notes) {
        return classify_every(fields, &caps[1]);
    }
    if let Some(caps) = WEEKLY_RE.captures(notes) {
        return classify_weekly(caps.get(1).map_or("", |m| m.as_str()));
    }

    match fields.recurring_type.as_deref() {
        Some("monthly") => {
            return anchor_for(fields, "Monthly").map(|anchor| RecurrenceRule::Monthly { anchor })
        }
        Some("yearly") => {
            return anchor_for(fields, "Yearly").map(|anchor| RecurrenceRule::Yearly { anchor })
        }
        Some("weekly") => {
            return anchor_for(fields, "Weekly").map(|anchor| RecurrenceRule::Weekly {
                days: vec![anchor.weekday()],
            })
        }
        Some("daily") => {
            return anchor_for(fields, "Daily")
                .map(|anchor| RecurrenceRule::EveryNDays { anchor, n: 1 })
        }
        Some("none") if fields.date.is_none() => return Ok(RecurrenceRule::None),
        Some("none") | None => {}
        Some(other) => return Err(vec![format!("Unknown recurrence type: {other}")]),
    }

    match fields.date.as_deref() {
        Some(raw) => parse_loose_date(raw)
            .map(|anchor| RecurrenceRule::Monthly { anchor })
            .ok_or_else(|| vec![format!("Invalid date: {raw}")]),
        None => Err(vec!["No recurrence pattern or date specified".to_string()]),
    }
}

// ---------------------------------------------------------------------------
// Windows and expansion
// ---------------------------------------------------------------------------

/// Inclusive date range occurrences are generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccurrenceWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl OccurrenceWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    /// The calendar month `[1st, last day]`. When that month is the current
    /// one and today is past `lookahead_day`, the window runs to the end of
    /// the following month so upcoming views are not empty near month-end.
    pub fn month_view(year: i32, month: u32, today: NaiveDate, lookahead_day: u32) -> Option<Self> {
        let start = first_of_month(year, month)?;
        let mut end = last_of_month(year, month)?;
        if today.year() == year && today.month() == month && today.day() > lookahead_day {
            let (ny, nm) = next_month(year, month);
            end = last_of_month(ny, nm)?;
        }
        Some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }
}

/// Occurrences of `first + k*step` (k >= 0) inside the window.
fn stepped(first: NaiveDate, step: i64, window: &OccurrenceWindow) -> Vec<NaiveDate> {
    if step <= 0 || first > window.end {
        return Vec::new();
    }
    let behind = (window.start - first).num_days();
    let skip = if behind > 0 { (behind + step - 1) / step } else { 0 };
    let mut out = Vec::new();
    let mut next = skip
        .checked_mul(step)
        .and_then(|offset| first.checked_add_signed(Duration::days(offset)));
    while let Some(date) = next.filter(|d| *d <= window.end) {
        out.push(date);
        next = date.checked_add_signed(Duration::days(step));
    }
    out
}

fn months_in(window: &OccurrenceWindow) -> Vec<(i32, u32)> {
    let mut months = Vec::new();
    let (mut y, mut m) = (window.start.year(), window.start.month());
    while (y, m) <= (window.end.year(), window.end.month()) {
        months.push((y, m));
        (y, m) = next_month(y, m);
    }
    months
}

/// Every occurrence of `rule` inside `window`, ascending.
pub fn expand(rule: &RecurrenceRule, window: &OccurrenceWindow) -> Vec<NaiveDate> {
    match rule {
        RecurrenceRule::None => Vec::new(),
        RecurrenceRule::Monthly { anchor } => months_in(window)
            .into_iter()
            .filter_map(|(y, m)| clamped_date(y, m, anchor.day()))
            .filter(|d| window.contains(*d))
            .collect(),
        RecurrenceRule::Weekly { days } => window
            .days()
            .filter(|d| days.contains(&d.weekday()))
            .collect(),
        RecurrenceRule::Biweekly { anchor, day } => {
            let offset = (day.num_days_from_monday() + 7 - anchor.weekday().num_days_from_monday()) % 7;
            match anchor.checked_add_signed(Duration::days(offset as i64)) {
                Some(first) => stepped(first, 14, window),
                None => Vec::new(),
            }
        }
        RecurrenceRule::EveryNDays { anchor, n } => stepped(*anchor, *n as i64, window),
        RecurrenceRule::Yearly { anchor } => (window.start.year()..=window.end.year())
            .filter_map(|y| clamped_date(y, anchor.month(), anchor.day()))
            .filter(|d| window.contains(*d))
            .collect(),
    }
}

/// Occurrences on or after `today`.
pub fn upcoming(rule: &RecurrenceRule, window: &OccurrenceWindow, today: NaiveDate) -> Vec<NaiveDate> {
    expand(rule, window).into_iter().filter(|d| *d >= today).collect()
}

/// Occurrences strictly before `today`; the complement of [`upcoming`].
pub fn past(rule: &RecurrenceRule, window: &OccurrenceWindow, today: NaiveDate) -> Vec<NaiveDate> {
    expand(rule, window).into_iter().filter(|d| *d < today).collect()
}
