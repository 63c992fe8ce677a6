use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown note: {0}")]
    UnknownNote(String),

    #[error("Note {0} is not a timeline")]
    NotATimeline(String),

    #[error("Line {line} is out of range (note has {len} content lines)")]
    LineOutOfRange { line: usize, len: usize },

    #[error("Line {0} is read-only")]
    ReadOnlyLine(usize),

    #[error("Note has no title line")]
    MissingTitle,

    #[error("Invalid month: {0} (expected YYYY-MM)")]
    InvalidMonth(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, NoteError>;
