use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Row};

use super::query::build_result_set;
use crate::error::SqlRunnerError;
use crate::results::ResultSet;

/// What running a whole script produced.
#[derive(Debug, Default)]
pub struct ScriptOutcome {
    /// Rows of the last statement that returned tabular output
    pub final_result: Option<ResultSet>,
    /// Result sets the server returned, one per statement
    pub statements: usize,
    /// How many of those carried column metadata
    pub tabular_statements: usize,
}

impl ScriptOutcome {
    /// True when at least one statement returned tabular output, even with no rows.
    #[must_use]
    pub fn has_result_set(&self) -> bool {
        self.final_result.is_some()
    }

    /// The value to print: the last tabular result, or an empty set when there was none.
    #[must_use]
    pub fn into_result_set(self) -> ResultSet {
        self.final_result.unwrap_or_default()
    }
}

/// Decide whether a statement without tabular output deserves a log line.
///
/// The first statement is always reported; later ones only when the server said something
/// beyond "done".
#[must_use]
pub fn should_log_executed(
    statement_index: usize,
    rows_affected: u64,
    last_insert_id: u64,
) -> bool {
    statement_index == 0 || rows_affected != 0 || last_insert_id != 0
}

/// Folds a script's result sets, in server order, into a [`ScriptOutcome`].
///
/// A result set with columns becomes the current final result, whether or not it has rows;
/// one without columns is logged as executed.
#[derive(Debug, Default)]
pub struct ResultSetWalker {
    outcome: ScriptOutcome,
}

impl ResultSetWalker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a statement that returned tabular output.
    pub fn on_result_set(&mut self, result_set: ResultSet) {
        self.outcome.statements += 1;
        self.outcome.tabular_statements += 1;

        let columns = result_set
            .get_column_names()
            .map(|names| names.as_slice().to_vec())
            .unwrap_or_default();
        tracing::info!(
            "Statement produced {} rows. Columns: {:?}",
            result_set.len(),
            columns
        );
        self.outcome.final_result = Some(result_set);
    }

    /// Record a statement without tabular output (DDL, DML, `DO`, `SET` ...).
    pub fn on_executed(&mut self, rows_affected: u64, last_insert_id: u64) {
        let index = self.outcome.statements;
        self.outcome.statements += 1;

        if should_log_executed(index, rows_affected, last_insert_id) {
            tracing::info!(
                "Statement executed. Rows affected: {}. Last inserted ID: {}",
                rows_affected,
                last_insert_id
            );
        }
    }

    #[must_use]
    pub fn finish(self) -> ScriptOutcome {
        self.outcome
    }
}

/// Send the whole script as one call and walk every result set it produces.
///
/// # Errors
/// Returns the first driver error raised by any statement, or a conversion error for a cell
/// that cannot be decoded. Statements before the failing one have already run.
pub async fn execute_script(conn: &mut Conn, sql: &str) -> Result<ScriptOutcome, SqlRunnerError> {
    let mut walker = ResultSetWalker::new();
    let mut result = conn.query_iter(sql).await?;

    while !result.is_empty() {
        // the OK packet of the next set is read by collect(), so take these first
        let columns = result.columns();
        let rows_affected = result.affected_rows();
        let last_insert_id = result.last_insert_id().unwrap_or(0);
        let rows: Vec<Row> = result.collect().await?;

        match columns {
            Some(columns) if !columns.is_empty() => {
                walker.on_result_set(build_result_set(&columns, &rows)?);
            }
            _ => walker.on_executed(rows_affected, last_insert_id),
        }
    }

    Ok(walker.finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::types::RowValues;

    fn set(names: &[&str], rows: Vec<Vec<RowValues>>) -> ResultSet {
        let names: Vec<String> = names.iter().map(|n| (*n).to_string()).collect();
        let mut result_set = ResultSet::with_columns(Arc::new(names));
        for row in rows {
            result_set.add_row_values(row);
        }
        result_set
    }

    #[test]
    fn last_tabular_statement_wins() {
        let mut walker = ResultSetWalker::new();
        walker.on_result_set(set(&["a"], vec![vec![RowValues::Int(1)]]));
        walker.on_result_set(set(
            &["b", "c"],
            vec![vec![RowValues::Int(2), RowValues::Int(3)]],
        ));

        let outcome = walker.finish();
        assert_eq!(outcome.statements, 2);
        assert_eq!(outcome.tabular_statements, 2);
        let json = serde_json::to_value(outcome.into_result_set()).expect("serializes");
        assert_eq!(json, serde_json::json!([{"b": 2, "c": 3}]));
    }

    #[test]
    fn zero_row_select_replaces_earlier_rows() {
        let mut walker = ResultSetWalker::new();
        walker.on_result_set(set(&["a"], vec![vec![RowValues::Int(1)]]));
        walker.on_result_set(set(&["id", "name"], Vec::new()));

        let outcome = walker.finish();
        assert_eq!(outcome.tabular_statements, 2);
        assert!(outcome.has_result_set());
        let json = serde_json::to_string(&outcome.into_result_set()).expect("serializes");
        assert_eq!(json, "[]");
    }

    #[test]
    fn lone_zero_row_select_still_counts_as_tabular() {
        let mut walker = ResultSetWalker::new();
        walker.on_executed(0, 0);
        walker.on_result_set(set(&["n"], Vec::new()));

        let outcome = walker.finish();
        assert!(outcome.has_result_set());
        assert_eq!(outcome.statements, 2);
        assert_eq!(outcome.tabular_statements, 1);
    }

    #[test]
    fn trailing_dml_does_not_clear_result() {
        let mut walker = ResultSetWalker::new();
        walker.on_result_set(set(&["id"], vec![vec![RowValues::Int(7)]]));
        walker.on_executed(3, 0);

        let outcome = walker.finish();
        assert!(outcome.has_result_set());
        assert_eq!(outcome.statements, 2);
        assert_eq!(outcome.into_result_set().len(), 1);
    }

    #[test]
    fn only_dml_yields_empty_output() {
        let mut walker = ResultSetWalker::new();
        walker.on_executed(0, 0);
        walker.on_executed(1, 42);

        let outcome = walker.finish();
        assert!(!outcome.has_result_set());
        assert_eq!(outcome.tabular_statements, 0);
        let json = serde_json::to_string(&outcome.into_result_set()).expect("serializes");
        assert_eq!(json, "[]");
    }

    #[test]
    fn executed_log_suppression() {
        assert!(should_log_executed(0, 0, 0));
        assert!(!should_log_executed(1, 0, 0));
        assert!(should_log_executed(4, 2, 0));
        assert!(should_log_executed(4, 0, 9));
    }
}
