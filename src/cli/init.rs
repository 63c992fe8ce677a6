use std::path::PathBuf;

use notedash::error::Result;
use notedash::settings::{load_settings, save_settings, shellexpand_path, Settings};

pub fn run(notes_path: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    let defaults = Settings::default();

    if let Some(path) = notes_path {
        settings.notes_path = shellexpand_path(&path);
    } else if settings.notes_path == defaults.notes_path {
        println!("Notes file or directory [{}]: ", settings.notes_path);
        let mut input = String::new();
        std::io::stdin().read_line(&mut input).ok();
        let chosen = input.trim();
        if !chosen.is_empty() {
            settings.notes_path = shellexpand_path(chosen);
        }
    }

    save_settings(&settings)?;

    let resolved = PathBuf::from(&settings.notes_path);
    if let Some(parent) = resolved.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    println!("Reading notes from {}", resolved.display());
    Ok(())
}
