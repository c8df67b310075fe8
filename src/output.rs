use std::io::Write;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::SqlRunnerError;
use crate::results::ResultSet;

const INDENT: &[u8] = b"    ";

/// Render the final result set as a pretty-printed JSON array.
///
/// # Errors
/// Returns `SqlRunnerError::Serialization` with a dump of the rows if a value has no JSON
/// form.
pub fn render_json(result_set: &ResultSet) -> Result<String, SqlRunnerError> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    result_set
        .serialize(&mut serializer)
        .map_err(|source| SqlRunnerError::Serialization {
            source,
            data: format!("{:?}", result_set.results),
        })?;
    // serde_json only ever writes UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the rendered document, followed by a newline, to `out`.
///
/// # Errors
/// Returns `SqlRunnerError::Io` if the write fails.
pub fn write_json<W: Write>(out: &mut W, json: &str) -> Result<(), SqlRunnerError> {
    writeln!(out, "{json}")?;
    out.flush()?;
    Ok(())
}
