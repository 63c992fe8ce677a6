use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const NOTES: &str = r#"[
  {
    "id": "trip",
    "content": "Trip to Lisbon\nBooked flights $300 : 01/01/2020\nFlew out : 05/01/2020\nPacking list\nmeta::timeline\n",
    "created_datetime": "2020-01-01T09:00:00+00:00"
  },
  {
    "id": "groceries",
    "content": "Groceries\nmilk\neggs\n",
    "created_datetime": "2020-01-02T09:00:00+00:00"
  },
  {
    "id": "mystery",
    "content": "event_description: Mystery\nevent_$: free\nevent_tags: recurring_payment\n"
  },
  {
    "id": "gym",
    "content": "event_description: Gym\nevent_$: 10\nevent_notes: weekly:mon,fri\nevent_tags: recurring_payment\n"
  },
  {
    "id": "lamp",
    "content": "event_description: Desk lamp\nevent_date: 2021-03-04\nevent_$: 45.50\nevent_tags: purchase\n"
  }
]
"#;

fn setup() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.json");
    std::fs::write(&path, NOTES).unwrap();
    (dir, path)
}

fn notedash(home: &Path, notes: &Path) -> Command {
    let mut cmd = Command::cargo_bin("notedash").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .arg("--log-level")
        .arg("off")
        .arg("--notes")
        .arg(notes);
    cmd
}

#[test]
fn test_timeline_shows_events_and_markers() {
    let (dir, notes) = setup();
    notedash(dir.path(), &notes)
        .args(["timeline", "trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trip to Lisbon"))
        .stdout(predicate::str::contains("Booked flights $300"))
        .stdout(predicate::str::contains("Packing list"))
        .stdout(predicate::str::contains("Today"))
        .stdout(predicate::str::contains("$300.00"));
}

#[test]
fn test_timeline_rejects_plain_note() {
    let (dir, notes) = setup();
    notedash(dir.path(), &notes)
        .args(["timeline", "groceries"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a timeline"));
}

#[test]
fn test_timeline_unknown_note() {
    let (dir, notes) = setup();
    notedash(dir.path(), &notes)
        .args(["timeline", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown note: nope"));
}

#[test]
fn test_timelines_lists_only_tagged_notes() {
    let (dir, notes) = setup();
    notedash(dir.path(), &notes)
        .arg("timelines")
        .assert()
        .success()
        .stdout(predicate::str::contains("Trip to Lisbon"))
        .stdout(predicate::str::contains("Groceries").not());
}

#[test]
fn test_validate_reports_problems() {
    let (dir, notes) = setup();
    notedash(dir.path(), &notes)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mystery"))
        .stdout(predicate::str::contains("Invalid amount: free"))
        .stdout(predicate::str::contains("No recurrence pattern or date specified"));
}

#[test]
fn test_purchases_total() {
    let (dir, notes) = setup();
    notedash(dir.path(), &notes)
        .arg("purchases")
        .assert()
        .success()
        .stdout(predicate::str::contains("Desk lamp"))
        .stdout(predicate::str::contains("$45.50"));
}

#[test]
fn test_payments_rejects_bad_month() {
    let (dir, notes) = setup();
    notedash(dir.path(), &notes)
        .args(["payments", "--month", "2024-13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid month"));
}

#[test]
fn test_payments_past_month_lists_occurrences() {
    let (dir, notes) = setup();
    notedash(dir.path(), &notes)
        .args(["payments", "--month", "2024-04", "--past"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Past payments 01/04/2024"))
        .stdout(predicate::str::contains("Weekly (Mon, Fri)"))
        .stdout(predicate::str::contains("01/04/2024"))
        .stdout(predicate::str::contains("26/04/2024"))
        .stdout(predicate::str::contains("$90.00"))
        .stdout(predicate::str::contains("1 payment(s) skipped"));
}

#[test]
fn test_payments_upcoming_in_past_month_is_empty() {
    let (dir, notes) = setup();
    notedash(dir.path(), &notes)
        .args(["payments", "--month", "2024-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Upcoming payments"))
        .stdout(predicate::str::contains("Gym").not())
        .stdout(predicate::str::contains("$0.00"));
}

#[test]
fn test_event_add_writes_note() {
    let (dir, notes) = setup();
    notedash(dir.path(), &notes)
        .args(["event", "add", "trip", "Dinner", "--date", "3/2/2021"])
        .assert()
        .success();

    let saved = std::fs::read_to_string(&notes).unwrap();
    assert!(saved.contains("Dinner : 03/02/2021\\nmeta::timeline"));
}

#[test]
fn test_event_delete_title_is_refused() {
    let (dir, notes) = setup();
    notedash(dir.path(), &notes)
        .args(["event", "delete", "trip", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("read-only"));
}

#[test]
fn test_close_then_timeline_shows_duration() {
    let (dir, notes) = setup();
    notedash(dir.path(), &notes)
        .args(["event", "close", "trip"])
        .assert()
        .success();
    notedash(dir.path(), &notes)
        .args(["timeline", "trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(closed)"))
        .stdout(predicate::str::contains("Total Duration"))
        .stdout(predicate::str::contains("4 days"));
}

#[test]
fn test_completions() {
    let (dir, notes) = setup();
    notedash(dir.path(), &notes)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("notedash"));
}
