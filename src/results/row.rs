use std::collections::HashMap;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::types::RowValues;

/// A row from a query result
///
/// This struct represents a single row from a result set,
/// with access to both the column names and the values.
#[derive(Debug, Clone)]
pub struct CustomDbRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub rows: Vec<RowValues>,
    // Column name to index of its last occurrence, shared by every row of the set
    #[doc(hidden)]
    pub(crate) column_index_cache: Arc<HashMap<String, usize>>,
}

impl CustomDbRow {
    /// Get the index of a column by name
    ///
    /// When a result repeats a column name the last occurrence wins, matching how the row
    /// is rendered as a JSON object.
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index_cache.get(column_name).copied()
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.rows.get(idx))
    }
}

pub(crate) fn build_column_index(column_names: &[String]) -> HashMap<String, usize> {
    column_names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), i))
        .collect()
}

impl Serialize for CustomDbRow {
    /// Emits an object keyed by column name in driver order. A repeated name appears once,
    /// at its first position, holding the value of its last occurrence.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.column_index_cache.len()))?;
        for (position, name) in self.column_names.iter().enumerate() {
            let first = self.column_names.iter().position(|col| col == name);
            if first != Some(position) {
                continue;
            }
            let value = self.get(name).unwrap_or(&RowValues::Null);
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
