use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{NoteError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_notes_path")]
    pub notes_path: String,
    /// Day of the month after which the payments view also covers next month.
    #[serde(default = "default_lookahead_day")]
    pub lookahead_day: u32,
}

fn default_notes_path() -> String {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("notedash")
        .join("notes.json")
        .to_string_lossy()
        .to_string()
}

fn default_lookahead_day() -> u32 {
    15
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notes_path: default_notes_path(),
            lookahead_day: default_lookahead_day(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("notedash")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| NoteError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.lookahead_day, 15);
        assert!(s.notes_path.ends_with("notes.json"));
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"notes_path": "/tmp/notes"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.notes_path, "/tmp/notes");
        assert_eq!(s.lookahead_day, 15);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let json = r#"{"notes_path": "/tmp/notes", "lookahead_day": 10, "cache_capacity": 8}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.lookahead_day, 10);
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            notes_path: "/tmp/n".to_string(),
            lookahead_day: 20,
        };
        std::fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();
        let loaded: Settings = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.lookahead_day, 20);
    }

    #[test]
    fn test_shellexpand_home() {
        if let Some(home) = dirs::home_dir() {
            let expanded = shellexpand_path("~/notes");
            assert!(expanded.starts_with(&*home.to_string_lossy()));
        }
    }
}
