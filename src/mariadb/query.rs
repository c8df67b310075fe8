use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use mysql_async::consts::{ColumnFlags, ColumnType};
use mysql_async::{Column, Row, Value};

use crate::error::SqlRunnerError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Collation id the server reports for binary strings and blobs.
pub const BINARY_CHARSET: u16 = 63;

/// How a server column type is carried into `RowValues`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    UInt,
    Float,
    Timestamp,
    Date,
    Json,
    Binary,
    Text,
}

/// Classify a column from its wire metadata.
///
/// DECIMAL and TIME stay textual: DECIMAL to keep its precision, TIME because MariaDB allows
/// values outside a single day. String and blob types are binary only under the binary
/// collation.
#[must_use]
pub fn value_kind(column_type: ColumnType, flags: ColumnFlags, character_set: u16) -> ValueKind {
    match column_type {
        ColumnType::MYSQL_TYPE_TINY
        | ColumnType::MYSQL_TYPE_SHORT
        | ColumnType::MYSQL_TYPE_INT24
        | ColumnType::MYSQL_TYPE_LONG
        | ColumnType::MYSQL_TYPE_LONGLONG
        | ColumnType::MYSQL_TYPE_YEAR => {
            if flags.contains(ColumnFlags::UNSIGNED_FLAG) {
                ValueKind::UInt
            } else {
                ValueKind::Int
            }
        }
        ColumnType::MYSQL_TYPE_FLOAT | ColumnType::MYSQL_TYPE_DOUBLE => ValueKind::Float,
        ColumnType::MYSQL_TYPE_DATETIME
        | ColumnType::MYSQL_TYPE_DATETIME2
        | ColumnType::MYSQL_TYPE_TIMESTAMP
        | ColumnType::MYSQL_TYPE_TIMESTAMP2 => ValueKind::Timestamp,
        ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => ValueKind::Date,
        ColumnType::MYSQL_TYPE_JSON => ValueKind::Json,
        ColumnType::MYSQL_TYPE_BIT | ColumnType::MYSQL_TYPE_GEOMETRY => ValueKind::Binary,
        ColumnType::MYSQL_TYPE_TINY_BLOB
        | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
        | ColumnType::MYSQL_TYPE_LONG_BLOB
        | ColumnType::MYSQL_TYPE_BLOB
        | ColumnType::MYSQL_TYPE_VARCHAR
        | ColumnType::MYSQL_TYPE_VAR_STRING
        | ColumnType::MYSQL_TYPE_STRING
            if character_set == BINARY_CHARSET =>
        {
            ValueKind::Binary
        }
        _ => ValueKind::Text,
    }
}

/// Column names of a result set, in server order.
#[must_use]
pub fn column_names(columns: &[Column]) -> Vec<String> {
    columns
        .iter()
        .map(|col| col.name_str().into_owned())
        .collect()
}

/// Convert one result set's rows into a [`ResultSet`] sharing `columns`' names.
///
/// # Errors
/// Returns `SqlRunnerError::Conversion` for a cell that does not match its column type.
pub fn build_result_set(columns: &[Column], rows: &[Row]) -> Result<ResultSet, SqlRunnerError> {
    let mut result_set = ResultSet::with_columns(Arc::new(column_names(columns)));
    for row in rows {
        result_set.add_row_values(extract_row_values(columns, row)?);
    }
    Ok(result_set)
}

/// Extract every cell of a row.
///
/// # Errors
/// Returns `SqlRunnerError::Conversion` for a cell that does not match its column type.
pub fn extract_row_values(
    columns: &[Column],
    row: &Row,
) -> Result<Vec<RowValues>, SqlRunnerError> {
    columns
        .iter()
        .enumerate()
        .map(|(idx, column)| match row.as_ref(idx) {
            Some(value) => mariadb_extract_value(column, value),
            None => Ok(RowValues::Null),
        })
        .collect()
}

/// Extracts a `RowValues` from one cell.
///
/// Script results come back over the text protocol, so almost every cell arrives as bytes
/// and is parsed according to its column type. Dates that chrono rejects (MariaDB's zero
/// date, for one) and JSON that does not parse fall back to their server text.
///
/// # Errors
/// Returns `SqlRunnerError::Conversion` if a numeric cell does not parse.
pub fn mariadb_extract_value(
    column: &Column,
    value: &Value,
) -> Result<RowValues, SqlRunnerError> {
    let kind = value_kind(column.column_type(), column.flags(), column.character_set());
    match value {
        Value::NULL => Ok(RowValues::Null),
        Value::Bytes(bytes) => decode_text(kind, bytes).map_err(|msg| {
            SqlRunnerError::Conversion(format!("column '{}': {msg}", column.name_str()))
        }),
        Value::Int(v) => Ok(RowValues::Int(*v)),
        Value::UInt(v) => Ok(RowValues::UInt(*v)),
        Value::Float(v) => Ok(RowValues::Float(f64::from(*v))),
        Value::Double(v) => Ok(RowValues::Float(*v)),
        // binary protocol only
        Value::Date(..) | Value::Time(..) => {
            Ok(RowValues::Text(value.as_sql(true).trim_matches('\'').to_string()))
        }
    }
}

fn decode_text(kind: ValueKind, bytes: &[u8]) -> Result<RowValues, String> {
    let value = match kind {
        ValueKind::Int => RowValues::Int(parse_number(bytes)?),
        ValueKind::UInt => RowValues::UInt(parse_number(bytes)?),
        ValueKind::Float => RowValues::Float(parse_number(bytes)?),
        ValueKind::Timestamp => match std::str::from_utf8(bytes).ok().and_then(parse_timestamp) {
            Some(ts) => RowValues::Timestamp(ts),
            None => text_or_blob(bytes),
        },
        ValueKind::Date => match std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        {
            Some(date) => RowValues::Date(date),
            None => text_or_blob(bytes),
        },
        ValueKind::Json => match serde_json::from_slice(bytes) {
            Ok(json) => RowValues::JSON(json),
            Err(_) => text_or_blob(bytes),
        },
        ValueKind::Binary => RowValues::Blob(bytes.to_vec()),
        ValueKind::Text => text_or_blob(bytes),
    };
    Ok(value)
}

fn parse_number<T: std::str::FromStr>(bytes: &[u8]) -> Result<T, String> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| format!("'{}' is not a number", String::from_utf8_lossy(bytes)))
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

// Text columns with a binary-safe collation can carry non-UTF-8 bytes; keep those as a blob.
fn text_or_blob(bytes: &[u8]) -> RowValues {
    match String::from_utf8(bytes.to_vec()) {
        Ok(text) => RowValues::Text(text),
        Err(err) => RowValues::Blob(err.into_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UTF8MB4: u16 = 45;

    fn kind(column_type: ColumnType) -> ValueKind {
        value_kind(column_type, ColumnFlags::empty(), UTF8MB4)
    }

    #[test]
    fn integer_types_follow_the_unsigned_flag() {
        for ty in [
            ColumnType::MYSQL_TYPE_TINY,
            ColumnType::MYSQL_TYPE_SHORT,
            ColumnType::MYSQL_TYPE_LONG,
            ColumnType::MYSQL_TYPE_LONGLONG,
        ] {
            assert_eq!(kind(ty), ValueKind::Int, "{ty:?}");
        }
        let unsigned = value_kind(
            ColumnType::MYSQL_TYPE_LONGLONG,
            ColumnFlags::UNSIGNED_FLAG,
            UTF8MB4,
        );
        assert_eq!(unsigned, ValueKind::UInt);
    }

    #[test]
    fn precision_sensitive_types_stay_textual() {
        assert_eq!(kind(ColumnType::MYSQL_TYPE_NEWDECIMAL), ValueKind::Text);
        assert_eq!(kind(ColumnType::MYSQL_TYPE_TIME), ValueKind::Text);
        assert_eq!(kind(ColumnType::MYSQL_TYPE_VAR_STRING), ValueKind::Text);
        assert_eq!(kind(ColumnType::MYSQL_TYPE_ENUM), ValueKind::Text);
    }

    #[test]
    fn temporal_json_and_binary_types() {
        assert_eq!(kind(ColumnType::MYSQL_TYPE_DATETIME), ValueKind::Timestamp);
        assert_eq!(kind(ColumnType::MYSQL_TYPE_TIMESTAMP), ValueKind::Timestamp);
        assert_eq!(kind(ColumnType::MYSQL_TYPE_DATE), ValueKind::Date);
        assert_eq!(kind(ColumnType::MYSQL_TYPE_JSON), ValueKind::Json);
        assert_eq!(kind(ColumnType::MYSQL_TYPE_DOUBLE), ValueKind::Float);
        assert_eq!(kind(ColumnType::MYSQL_TYPE_BLOB), ValueKind::Text);
        let varbinary = value_kind(
            ColumnType::MYSQL_TYPE_VAR_STRING,
            ColumnFlags::empty(),
            BINARY_CHARSET,
        );
        assert_eq!(varbinary, ValueKind::Binary);
    }

    #[test]
    fn text_cells_parse_by_kind() {
        assert_eq!(decode_text(ValueKind::Int, b"-12"), Ok(RowValues::Int(-12)));
        assert_eq!(
            decode_text(ValueKind::UInt, b"18446744073709551615"),
            Ok(RowValues::UInt(u64::MAX))
        );
        assert_eq!(decode_text(ValueKind::Float, b"2.5"), Ok(RowValues::Float(2.5)));
        assert_eq!(
            decode_text(ValueKind::Text, b"19.99"),
            Ok(RowValues::Text("19.99".into()))
        );
        assert!(decode_text(ValueKind::Int, b"twelve").is_err());
    }

    #[test]
    fn temporal_cells_fall_back_to_text() {
        let ts = decode_text(ValueKind::Timestamp, b"2024-03-09 07:05:00.250000");
        assert!(matches!(ts, Ok(RowValues::Timestamp(_))));
        assert_eq!(
            decode_text(ValueKind::Timestamp, b"0000-00-00 00:00:00"),
            Ok(RowValues::Text("0000-00-00 00:00:00".into()))
        );
        assert!(matches!(
            decode_text(ValueKind::Date, b"1999-12-31"),
            Ok(RowValues::Date(_))
        ));
    }

    #[test]
    fn json_cells_are_embedded() {
        assert_eq!(
            decode_text(ValueKind::Json, br#"{"a": [1, 2]}"#),
            Ok(RowValues::JSON(serde_json::json!({"a": [1, 2]})))
        );
        assert_eq!(
            decode_text(ValueKind::Json, b"{broken"),
            Ok(RowValues::Text("{broken".into()))
        );
    }

    #[test]
    fn binary_cells_stay_bytes() {
        assert_eq!(
            decode_text(ValueKind::Binary, &[0xde, 0xad]),
            Ok(RowValues::Blob(vec![0xde, 0xad]))
        );
        assert_eq!(
            decode_text(ValueKind::Text, &[0xff, 0x41]),
            Ok(RowValues::Blob(vec![0xff, 0x41]))
        );
    }
}
