use std::io::IsTerminal;
use std::str::FromStr;

use tracing::Level;

/// Environment variable that overrides the default `INFO` level.
pub const LOG_LEVEL_VAR: &str = "RUN_SQL_LOG";

/// Parse a level name, falling back to `INFO` for anything unrecognised.
#[must_use]
pub fn level_from(value: Option<&str>) -> Level {
    value
        .and_then(|raw| Level::from_str(raw.trim()).ok())
        .unwrap_or(Level::INFO)
}

/// Send all diagnostics to stderr so stdout carries only the JSON document.
pub fn init() {
    let level = level_from(std::env::var(LOG_LEVEL_VAR).ok().as_deref());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_max_level(level)
        .init();
}
