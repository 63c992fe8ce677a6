use notedash::edit;
use notedash::error::{NoteError, Result};
use notedash::store::NoteStore;

use super::open_store;

fn content_of(store: &NoteStore, id: &str) -> Result<String> {
    store
        .get(id)
        .map(|n| n.content.clone())
        .ok_or_else(|| NoteError::UnknownNote(id.to_string()))
}

fn write_back(mut store: NoteStore, id: &str, content: String) -> Result<()> {
    store.update_content(id, content)?;
    store.save()
}

pub fn add(
    notes: Option<&str>,
    id: &str,
    text: &str,
    date: Option<&str>,
    link: Option<&str>,
) -> Result<()> {
    let store = open_store(notes)?;
    let content = content_of(&store, id)?;
    let updated = edit::append_event(&content, text, date.unwrap_or(""), link)?;
    write_back(store, id, updated)?;
    println!("Added event to {id}: {}", edit::format_event_line(text, date.unwrap_or(""), link));
    Ok(())
}

pub fn edit(
    notes: Option<&str>,
    id: &str,
    line: usize,
    text: &str,
    date: Option<&str>,
    link: Option<&str>,
) -> Result<()> {
    let store = open_store(notes)?;
    let content = content_of(&store, id)?;
    let updated = edit::replace_event(&content, line, text, date.unwrap_or(""), link)?;
    write_back(store, id, updated)?;
    println!("Updated line {line} of {id}");
    Ok(())
}

pub fn delete(notes: Option<&str>, id: &str, line: usize) -> Result<()> {
    let store = open_store(notes)?;
    let content = content_of(&store, id)?;
    let updated = edit::delete_event(&content, line)?;
    write_back(store, id, updated)?;
    println!("Deleted line {line} of {id}");
    Ok(())
}

pub fn set_closed(notes: Option<&str>, id: &str, closed: bool) -> Result<()> {
    let store = open_store(notes)?;
    let content = content_of(&store, id)?;
    write_back(store, id, edit::set_closed(&content, closed))?;
    println!("{id} is now {}", if closed { "closed" } else { "open" });
    Ok(())
}
