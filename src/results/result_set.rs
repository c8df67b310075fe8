use std::collections::HashMap;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use super::row::{CustomDbRow, build_column_index};
use crate::types::RowValues;

/// A result set produced by one statement of a script
///
/// Holds the rows returned by the statement together with the column names they share.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the statement
    pub results: Vec<CustomDbRow>,
    /// Column names shared by all rows (to avoid duplicating in each row)
    column_names: Option<Arc<Vec<String>>>,
    column_index: Arc<HashMap<String, usize>>,
}

impl ResultSet {
    /// Create an empty result set for the given columns
    #[must_use]
    pub fn with_columns(column_names: Arc<Vec<String>>) -> ResultSet {
        let mut result_set = ResultSet::default();
        result_set.set_column_names(column_names);
        result_set
    }

    /// Set the column names for this result set (to be shared by all rows)
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_index = Arc::new(build_column_index(&column_names));
        self.column_names = Some(column_names);
    }

    /// Get the column names for this result set
    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Add a row of values in column order
    ///
    /// Rows added before any column names are set are ignored.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        if let Some(column_names) = &self.column_names {
            self.results.push(CustomDbRow {
                column_names: Arc::clone(column_names),
                rows: row_values,
                column_index_cache: Arc::clone(&self.column_index),
            });
        }
    }

    /// Number of rows held
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.results.len()))?;
        for row in &self.results {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_share_column_names() {
        let mut rs = ResultSet::with_columns(Arc::new(vec!["id".into(), "name".into()]));
        rs.add_row_values(vec![RowValues::Int(1), RowValues::Text("x".into())]);
        rs.add_row_values(vec![RowValues::Int(2), RowValues::Null]);

        assert_eq!(rs.len(), 2);
        assert!(Arc::ptr_eq(&rs.results[0].column_names, &rs.results[1].column_names));
        assert_eq!(rs.results[1].get("name"), Some(&RowValues::Null));
    }

    #[test]
    fn rows_without_columns_are_dropped() {
        let mut rs = ResultSet::default();
        rs.add_row_values(vec![RowValues::Int(1)]);
        assert!(rs.is_empty());
        assert!(rs.get_column_names().is_none());
    }

    #[test]
    fn serializes_as_array_of_objects() {
        let mut rs = ResultSet::with_columns(Arc::new(vec!["id".into(), "name".into()]));
        rs.add_row_values(vec![RowValues::Int(1), RowValues::Text("x".into())]);
        let json = serde_json::to_value(&rs).expect("serializes");
        assert_eq!(json, serde_json::json!([{"id": 1, "name": "x"}]));
    }
}
