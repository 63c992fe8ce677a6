use chrono::Datelike;
use colored::Colorize;
use comfy_table::{Cell, Table};

use notedash::dates::format_note_date;
use notedash::error::{NoteError, Result};
use notedash::fmt::money;
use notedash::payments::{self, past_payments, upcoming_payments, validate_payments};
use notedash::recurrence::OccurrenceWindow;
use notedash::settings::load_settings;

use super::{open_store, parse_month, today};

pub fn run(notes: Option<&str>, month: Option<&str>, past: bool) -> Result<()> {
    let store = open_store(notes)?;
    let today = today();
    let (year, month) = match month {
        Some(raw) => parse_month(raw)?,
        None => (today.year(), today.month()),
    };
    let settings = load_settings();
    let window = OccurrenceWindow::month_view(year, month, today, settings.lookahead_day)
        .ok_or_else(|| NoteError::InvalidMonth(format!("{year:04}-{month:02}")))?;

    let occurrences = if past {
        past_payments(store.notes(), &window, today)
    } else {
        upcoming_payments(store.notes(), &window, today)
    };

    let mut table = Table::new();
    table.set_header(vec!["Date", "Payment", "Cadence", "Amount"]);
    for o in &occurrences {
        table.add_row(vec![
            Cell::new(format_note_date(o.date)),
            Cell::new(&o.description),
            Cell::new(&o.cadence_label),
            Cell::new(money(o.amount)),
        ]);
    }
    let total: f64 = occurrences.iter().map(|o| o.amount).sum();
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(""),
        Cell::new(""),
        Cell::new(money(total).bold()),
    ]);

    let heading = if past { "Past payments" } else { "Upcoming payments" };
    println!(
        "{heading} {} \u{2192} {}\n{table}",
        format_note_date(window.start),
        format_note_date(window.end)
    );

    let invalid = validate_payments(store.notes()).len();
    if invalid > 0 {
        println!(
            "{}",
            format!("{invalid} payment(s) skipped; run `notedash validate` for details").red()
        );
    }
    Ok(())
}

pub fn validate(notes: Option<&str>) -> Result<()> {
    let store = open_store(notes)?;
    let errors = validate_payments(store.notes());
    if errors.is_empty() {
        println!("{}", "All recurring payments are valid.".green());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Payment", "Amount", "Problems"]);
    for e in &errors {
        table.add_row(vec![
            Cell::new(&e.source_note_id),
            Cell::new(&e.description),
            Cell::new(money(e.amount)),
            Cell::new(e.reasons.join("\n").red()),
        ]);
    }
    println!("Invalid recurring payments\n{table}");
    Ok(())
}

pub fn purchases(notes: Option<&str>) -> Result<()> {
    let store = open_store(notes)?;
    let summary = payments::purchases(store.notes());

    let mut table = Table::new();
    table.set_header(vec!["Date", "Purchase", "Amount"]);
    for p in &summary.items {
        table.add_row(vec![
            Cell::new(p.date.map(format_note_date).unwrap_or_default()),
            Cell::new(&p.description),
            Cell::new(money(p.amount)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(""),
        Cell::new(money(summary.total).bold()),
    ]);
    println!("Purchases\n{table}");
    Ok(())
}
