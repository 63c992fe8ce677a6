use chrono::NaiveDate;

use crate::amounts::{extract_dollars, parse_amount};
use crate::dates::parse_loose_date;
use crate::fields::{parse_event_fields, EventFields};
use crate::models::Note;
use crate::recurrence::{self, classify, OccurrenceWindow, RecurrenceRule};

pub const RECURRING_PAYMENT_TAG: &str = "recurring_payment";
pub const PURCHASE_TAG: &str = "purchase";

/// A note tagged `recurring_payment`, with its cadence worked out.
#[derive(Debug, Clone)]
pub struct PaymentNote {
    pub note_id: String,
    pub description: String,
    pub fields: EventFields,
    pub amount: f64,
    pub cadence: Result<RecurrenceRule, Vec<String>>,
}

impl PaymentNote {
    fn from_note(note: &Note, fields: EventFields) -> Self {
        let description = fields.description.clone().unwrap_or_default();
        let amount = payment_amount(&fields);
        let cadence = classify(&fields);
        Self {
            note_id: note.id.clone(),
            description,
            fields,
            amount,
            cadence,
        }
    }

    /// Cadence and amount problems, in that order. Empty when valid.
    pub fn problems(&self) -> Vec<String> {
        let mut reasons = match &self.cadence {
            Ok(RecurrenceRule::None) => vec!["No recurrence pattern or date specified".to_string()],
            Ok(_) => Vec::new(),
            Err(problems) => problems.clone(),
        };
        if !(self.amount.is_finite() && self.amount > 0.0) {
            reasons.push(match self.fields.price.as_deref() {
                Some(raw) => format!("Invalid amount: {raw}"),
                None => "Missing amount".to_string(),
            });
        }
        reasons
    }

    pub fn has_error(&self) -> bool {
        !self.problems().is_empty()
    }
}

/// `event_$` when present, otherwise any dollar amounts in the description.
fn payment_amount(fields: &EventFields) -> f64 {
    match fields.price.as_deref() {
        Some(raw) => parse_amount(raw),
        None => fields.description.as_deref().map(extract_dollars).unwrap_or(0.0),
    }
}

pub fn payment_notes(notes: &[Note]) -> Vec<PaymentNote> {
    notes
        .iter()
        .filter_map(|note| {
            let fields = parse_event_fields(&note.content);
            fields
                .has_tag(RECURRING_PAYMENT_TAG)
                .then(|| PaymentNote::from_note(note, fields))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Occurrences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentOccurrence {
    pub source_note_id: String,
    pub description: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub cadence_label: String,
}

fn occurrences(
    notes: &[Note],
    window: &OccurrenceWindow,
    pick: impl Fn(&RecurrenceRule) -> Vec<NaiveDate>,
) -> Vec<PaymentOccurrence> {
    let mut out = Vec::new();
    for payment in payment_notes(notes) {
        if payment.has_error() {
            log::debug!("event=payment_skipped id={}", payment.note_id);
            continue;
        }
        let Ok(rule) = &payment.cadence else { continue };
        for date in pick(rule) {
            out.push(PaymentOccurrence {
                source_note_id: payment.note_id.clone(),
                description: payment.description.clone(),
                date,
                amount: payment.amount,
                cadence_label: rule.label(),
            });
        }
    }
    log::debug!(
        "event=payments_expanded window_start={} window_end={} count={}",
        window.start,
        window.end,
        out.len()
    );
    out.sort_by_key(|o| o.date);
    out
}

/// Occurrences inside `window` on or after `today`, by date.
pub fn upcoming_payments(
    notes: &[Note],
    window: &OccurrenceWindow,
    today: NaiveDate,
) -> Vec<PaymentOccurrence> {
    occurrences(notes, window, |rule| recurrence::upcoming(rule, window, today))
}

/// Occurrences inside `window` before `today`, by date.
pub fn past_payments(
    notes: &[Note],
    window: &OccurrenceWindow,
    today: NaiveDate,
) -> Vec<PaymentOccurrence> {
    occurrences(notes, window, |rule| recurrence::past(rule, window, today))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub source_note_id: String,
    pub description: String,
    pub reasons: Vec<String>,
    pub amount: f64,
}

/// One entry per recurring-payment note that cannot be scheduled or has a
/// bad amount. All reasons are reported, not just the first.
pub fn validate_payments(notes: &[Note]) -> Vec<ValidationError> {
    payment_notes(notes)
        .into_iter()
        .filter_map(|payment| {
            let reasons = payment.problems();
            if reasons.is_empty() {
                return None;
            }
            Some(ValidationError {
                source_note_id: payment.note_id,
                description: payment.description,
                reasons,
                amount: payment.amount,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Purchases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    pub note_id: String,
    pub description: String,
    pub date: Option<NaiveDate>,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PurchaseSummary {
    pub items: Vec<Purchase>,
    pub total: f64,
}

/// Event notes tagged `purchase`, dated ones first by date.
pub fn purchases(notes: &[Note]) -> PurchaseSummary {
    let mut items: Vec<Purchase> = notes
        .iter()
        .filter_map(|note| {
            let fields = parse_event_fields(&note.content);
            if !fields.is_event() || !fields.has_tag(PURCHASE_TAG) {
                return None;
            }
            Some(Purchase {
                note_id: note.id.clone(),
                amount: payment_amount(&fields),
                date: fields.date.as_deref().and_then(parse_loose_date),
                description: fields.description.unwrap_or_default(),
            })
        })
        .collect();
    items.sort_by_key(|p| (p.date.is_none(), p.date));
    let total = items.iter().map(|p| p.amount).sum();
    PurchaseSummary { items, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payment(id: &str, body: &str) -> Note {
        Note::new(id, format!("event_tags: recurring_payment\n{body}"))
    }

    #[test]
    fn test_monthly_payment_on_31st_in_february() {
        let notes = vec![payment("rent", "event_description: Rent\nevent_date: 2024-01-31\nevent_$: 1,500")];
        let window = OccurrenceWindow::new(ymd(2024, 2, 1), ymd(2024, 2, 29));
        let occ = upcoming_payments(&notes, &window, ymd(2024, 2, 1));
        assert_eq!(occ.len(), 1);
        assert_eq!(occ[0].date, ymd(2024, 2, 29));
        assert_eq!(occ[0].amount, 1500.0);
        assert_eq!(occ[0].cadence_label, "Monthly");
        assert_eq!(occ[0].source_note_id, "rent");
    }

    #[test]
    fn test_upcoming_and_past_are_complements() {
        let notes = vec![payment(
            "gym",
            "event_description: Gym\nevent_$: 10\nevent_notes: weekly:mon,fri",
        )];
        let window = OccurrenceWindow::new(ymd(2024, 4, 1), ymd(2024, 4, 30));
        let today = ymd(2024, 4, 15);
        let up = upcoming_payments(&notes, &window, today);
        let past = past_payments(&notes, &window, today);
        assert!(up.iter().all(|o| o.date >= today));
        assert!(past.iter().all(|o| o.date < today));
        // Mondays: 1,8,15,22,29  Fridays: 5,12,19,26
        assert_eq!(up.len() + past.len(), 9);
        assert_eq!(up[0].date, today);
    }

    #[test]
    fn test_every_n_days_next_occurrence() {
        let today = ymd(2024, 6, 20);
        let anchor = (today - Duration::days(10)).format("%Y-%m-%d").to_string();
        let notes = vec![payment(
            "water",
            &format!("event_description: Water delivery\nevent_date: {anchor}\nevent_$: 25\nevent_notes: every:7"),
        )];
        let window = OccurrenceWindow::new(today, today + Duration::days(60));
        let occ = upcoming_payments(&notes, &window, today);
        assert_eq!(occ[0].date, today + Duration::days(4));
        assert_eq!(occ[0].cadence_label, "Every 7 days");
    }

    #[test]
    fn test_biweekly_without_start_date_is_an_error() {
        let notes = vec![payment(
            "bw",
            "event_description: Cleaner\nevent_$: 80\nevent_notes: biweekly:tuesday",
        )];
        let errors = validate_payments(&notes);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].reasons.iter().any(|r| r.contains("requires a start date")));
        let window = OccurrenceWindow::new(ymd(2024, 1, 1), ymd(2024, 12, 31));
        assert!(upcoming_payments(&notes, &window, ymd(2024, 1, 1)).is_empty());
    }

    #[test]
    fn test_cadence_and_amount_errors_both_reported() {
        let notes = vec![payment("bad", "event_description: Mystery\nevent_$: free")];
        let errors = validate_payments(&notes);
        assert_eq!(
            errors[0].reasons,
            vec![
                "No recurrence pattern or date specified".to_string(),
                "Invalid amount: free".to_string(),
            ]
        );
        assert_eq!(errors[0].amount, 0.0);
    }

    #[test]
    fn test_negative_amount_is_an_error() {
        let notes = vec![payment("neg", "event_description: Refund\nevent_date: 2024-01-05\nevent_$: -20")];
        let errors = validate_payments(&notes);
        assert_eq!(errors[0].reasons, vec!["Invalid amount: -20".to_string()]);
    }

    #[test]
    fn test_amount_from_description() {
        let notes = vec![payment("s", "event_description: Streaming $15.99\nevent_date: 2024-01-05")];
        assert!(validate_payments(&notes).is_empty());
        let notes = vec![payment("s", "event_description: Streaming\nevent_date: 2024-01-05")];
        assert_eq!(validate_payments(&notes)[0].reasons, vec!["Missing amount".to_string()]);
    }

    #[test]
    fn test_interval_beyond_calendar_is_reported_not_expanded() {
        let notes = vec![payment(
            "far",
            "event_description: Far future\nevent_date: 2024-04-20\nevent_$: 5\nevent_notes: every:100000000",
        )];
        let errors = validate_payments(&notes);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].reasons[0].starts_with("Invalid interval"));
        let window = OccurrenceWindow::new(ymd(2024, 4, 1), ymd(2024, 4, 30));
        assert!(upcoming_payments(&notes, &window, ymd(2024, 4, 1)).is_empty());
    }

    #[test]
    fn test_recurring_type_none_without_date_is_an_error() {
        let notes = vec![payment("once", "event_description: One-off\nevent_$: 20\nevent_recurring_type: none")];
        let errors = validate_payments(&notes);
        assert_eq!(errors[0].reasons, vec!["No recurrence pattern or date specified".to_string()]);
    }

    #[test]
    fn test_untagged_notes_are_ignored() {
        let notes = vec![Note::new("x", "event_description: Rent\nevent_$: 0")];
        assert!(validate_payments(&notes).is_empty());
        assert!(payment_notes(&notes).is_empty());
    }

    #[test]
    fn test_purchases() {
        let notes = vec![
            Note::new("p1", "event_description: Laptop\nevent_date: 2024-03-01\nevent_$: 1,200\nevent_tags: purchase"),
            Note::new("p2", "event_description: Cable\nevent_tags: purchase\nevent_$: 9.50"),
            Note::new("p3", "event_description: Desk\nevent_date: 2024-01-10\nevent_$: 300\nevent_tags: Purchase"),
            Note::new("r", "event_description: Rent\nevent_tags: recurring_payment"),
        ];
        let summary = purchases(&notes);
        let ids: Vec<&str> = summary.items.iter().map(|p| p.note_id.as_str()).collect();
        assert_eq!(ids, vec!["p3", "p1", "p2"]);
        assert_eq!(summary.total, 1509.5);
    }
}
