use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::{NoteError, Result};
use crate::models::Note;

const NOTE_EXTENSIONS: &[&str] = &["txt", "md"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    /// A single JSON array of notes.
    JsonFile,
    /// One `<id>.txt` / `<id>.md` file per note.
    Directory,
}

/// File-backed note snapshot used by the CLI.
#[derive(Debug)]
pub struct NoteStore {
    path: PathBuf,
    format: StoreFormat,
    notes: Vec<Note>,
    files: HashMap<String, PathBuf>,
    dirty: BTreeSet<String>,
}

impl NoteStore {
    /// Load every note under `path`. A missing JSON file is an empty store.
    pub fn open(path: &Path) -> Result<Self> {
        let mut store = Self {
            path: path.to_path_buf(),
            format: if path.is_dir() {
                StoreFormat::Directory
            } else {
                StoreFormat::JsonFile
            },
            notes: Vec::new(),
            files: HashMap::new(),
            dirty: BTreeSet::new(),
        };
        match store.format {
            StoreFormat::Directory => store.load_dir()?,
            StoreFormat::JsonFile if path.exists() => {
                let content = std::fs::read_to_string(path)?;
                if !content.trim().is_empty() {
                    store.notes = serde_json::from_str(&content)?;
                }
            }
            StoreFormat::JsonFile => {}
        }
        log::debug!(
            "event=store_open path={} format={:?} notes={}",
            path.display(),
            store.format,
            store.notes.len()
        );
        Ok(store)
    }

    fn load_dir(&mut self) -> Result<()> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| NOTE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
            })
            .collect();
        paths.sort();
        for path in paths {
            let Some(id) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            let content = std::fs::read_to_string(&path)?;
            let created_datetime = std::fs::metadata(&path)
                .and_then(|m| m.modified())
                .map(|t| DateTime::<Local>::from(t).to_rfc3339())
                .unwrap_or_default();
            self.files.insert(id.clone(), path);
            self.notes.push(Note {
                id,
                content,
                created_datetime,
            });
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> StoreFormat {
        self.format
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn update_content(&mut self, id: &str, content: String) -> Result<()> {
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| NoteError::UnknownNote(id.to_string()))?;
        note.content = content;
        self.dirty.insert(id.to_string());
        Ok(())
    }

    /// Write changed notes back in the store's own format.
    pub fn save(&mut self) -> Result<()> {
        match self.format {
            StoreFormat::JsonFile => {
                if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                let json = serde_json::to_string_pretty(&self.notes)?;
                std::fs::write(&self.path, format!("{json}\n"))?;
            }
            StoreFormat::Directory => {
                for id in &self.dirty {
                    let Some(note) = self.notes.iter().find(|n| &n.id == id) else {
                        continue;
                    };
                    let file = self
                        .files
                        .get(id)
                        .cloned()
                        .unwrap_or_else(|| self.path.join(format!("{id}.txt")));
                    std::fs::write(file, &note.content)?;
                }
            }
        }
        self.dirty.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_json_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::open(&dir.path().join("notes.json")).unwrap();
        assert!(store.notes().is_empty());
        assert_eq!(store.format(), StoreFormat::JsonFile);
    }

    #[test]
    fn test_json_roundtrip_update() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");
        std::fs::write(&path, r#"[{"id": "a", "content": "Trip\nmeta::timeline"}]"#).unwrap();
        let mut store = NoteStore::open(&path).unwrap();
        assert_eq!(store.get("a").unwrap().created_datetime, "");
        store.update_content("a", "Trip 2\nmeta::timeline".to_string()).unwrap();
        store.save().unwrap();
        let reopened = NoteStore::open(&path).unwrap();
        assert_eq!(reopened.get("a").unwrap().content, "Trip 2\nmeta::timeline");
    }

    #[test]
    fn test_directory_store() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("trip.txt"), "Trip\nmeta::timeline").unwrap();
        std::fs::write(dir.path().join("rent.md"), "event_description: Rent").unwrap();
        std::fs::write(dir.path().join("ignore.png"), "x").unwrap();
        let mut store = NoteStore::open(dir.path()).unwrap();
        assert_eq!(store.format(), StoreFormat::Directory);
        let ids: Vec<&str> = store.notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["rent", "trip"]);
        assert!(!store.get("trip").unwrap().created_datetime.is_empty());

        store.update_content("rent", "event_description: Rent 2".to_string()).unwrap();
        store.save().unwrap();
        let content = std::fs::read_to_string(dir.path().join("rent.md")).unwrap();
        assert_eq!(content, "event_description: Rent 2");
    }

    #[test]
    fn test_update_unknown_note() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = NoteStore::open(&dir.path().join("notes.json")).unwrap();
        assert!(matches!(
            store.update_content("nope", String::new()),
            Err(NoteError::UnknownNote(_))
        ));
    }
}
