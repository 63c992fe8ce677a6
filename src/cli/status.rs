use notedash::error::Result;
use notedash::grammar::note_flags;
use notedash::payments::{payment_notes, validate_payments};
use notedash::settings::{load_settings, settings_path};

use super::{notes_path, open_store};

pub fn run(notes: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let path = notes_path(notes);

    println!("Settings:   {}", settings_path().display());
    println!("Notes:      {}", path.display());

    if !path.exists() {
        println!();
        println!("Notes source not found. Run `notedash init --notes-path <path>` to set one.");
        return Ok(());
    }

    let store = open_store(notes)?;
    let all = store.notes();
    let timelines = all
        .iter()
        .filter(|n| {
            let flags = note_flags(&n.content);
            flags.timeline || flags.flagged
        })
        .count();
    let payments = payment_notes(all).len();
    let invalid = validate_payments(all).len();

    println!();
    println!("Notes:            {}", all.len());
    println!("Timelines:        {timelines}");
    println!("Payments:         {payments}");
    println!("Invalid payments: {invalid}");
    Ok(())
}
