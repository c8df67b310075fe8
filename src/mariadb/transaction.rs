use mysql_async::Conn;
use mysql_async::prelude::Queryable;

use super::connection::ScriptSession;
use crate::error::SqlRunnerError;

/// Begin a new transaction on the provided connection.
///
/// # Errors
/// Returns an error if the server rejects `START TRANSACTION`.
pub async fn begin_transaction(conn: &mut Conn) -> Result<(), SqlRunnerError> {
    conn.query_drop("START TRANSACTION").await?;
    Ok(())
}

/// Commit the open transaction.
///
/// # Errors
/// Returns an error if the commit fails.
pub async fn commit(conn: &mut Conn) -> Result<(), SqlRunnerError> {
    conn.query_drop("COMMIT").await?;
    Ok(())
}

/// Roll back the open transaction.
///
/// # Errors
/// Returns an error if the server rejects `ROLLBACK` or the connection is gone.
pub async fn rollback(conn: &mut Conn) -> Result<(), SqlRunnerError> {
    conn.query_drop("ROLLBACK").await?;
    Ok(())
}

/// Roll back after `cause`, logging the outcome. A failure here is reported but never
/// replaces `cause`, so nothing is returned.
pub async fn rollback_after<S: ScriptSession>(session: &mut S, cause: &SqlRunnerError) {
    if cause.is_database() {
        tracing::warn!("Rolling back transaction due to error: {cause}");
    } else {
        tracing::warn!("Rolling back transaction due to unexpected error: {cause}");
    }

    match session.rollback().await {
        Ok(()) => tracing::info!("Transaction rolled back."),
        Err(err) => tracing::error!("Error during rollback: {err}"),
    }
}
