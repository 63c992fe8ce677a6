//! Diagnostics for the command-line front end.
//!
//! The library only talks to the `log` facade; this module wires a stderr
//! backend once per process.

use flexi_logger::{Logger, LoggerHandle};
use once_cell::sync::OnceCell;

use crate::error::{NoteError, Result};

static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();

pub const DEFAULT_LEVEL: &str = "warn";

pub fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(NoteError::Other(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error|off"
        ))),
    }
}

/// Start stderr logging at `level`. `RUST_LOG`, when set, wins. Calling it
/// again after a successful start is a no-op.
pub fn init_logging(level: &str) -> Result<()> {
    let level = normalize_level(level)?;
    LOGGER.get_or_try_init(|| {
        Logger::try_with_env_or_str(level)
            .and_then(|logger| logger.log_to_stderr().start())
            .map_err(|e| NoteError::Other(format!("failed to start logger: {e}")))
    })?;
    log::debug!(
        "event=app_start version={} level={level}",
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}
