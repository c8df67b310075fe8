use std::fmt::Write as _;

use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::{Error as SerError, Serialize, Serializer};
use serde_json::Value as JsonValue;

/// Values that can come back in a MariaDB result row.
///
/// The schema of an ad-hoc script is unknown until it runs, so every cell is carried as
/// one of these variants:
/// ```rust
/// use run_sql::prelude::*;
///
/// let row = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Null,
/// ];
/// # let _ = row;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Signed integer value (64-bit)
    Int(i64),
    /// Unsigned integer value, for `BIGINT UNSIGNED` and friends
    UInt(u64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value, also used for DECIMAL and TIME which have no lossless JSON form
    Text(String),
    /// Timestamp value (DATETIME, TIMESTAMP)
    Timestamp(NaiveDateTime),
    /// Calendar date (DATE)
    Date(NaiveDate),
    /// NULL value
    Null,
    /// JSON document from a JSON column, embedded as-is
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

/// Render binary data as text: UTF-8 when it decodes cleanly, `0x`-prefixed hex otherwise.
#[must_use]
pub fn blob_to_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let mut out = String::with_capacity(2 + bytes.len() * 2);
            out.push_str("0x");
            for byte in bytes {
                let _ = write!(out, "{byte:02x}");
            }
            out
        }
    }
}

impl Serialize for RowValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RowValues::Int(v) => serializer.serialize_i64(*v),
            RowValues::UInt(v) => serializer.serialize_u64(*v),
            RowValues::Float(v) => {
                if v.is_finite() {
                    serializer.serialize_f64(*v)
                } else {
                    Err(S::Error::custom(format!(
                        "float value {v} is not representable in JSON"
                    )))
                }
            }
            RowValues::Text(v) => serializer.serialize_str(v),
            RowValues::Timestamp(v) => serializer.collect_str(v),
            RowValues::Date(v) => serializer.collect_str(v),
            RowValues::Null => serializer.serialize_unit(),
            RowValues::JSON(v) => v.serialize(serializer),
            RowValues::Blob(v) => serializer.serialize_str(&blob_to_text(v)),
        }
    }
}
