use async_trait::async_trait;
use mysql_async::Conn;

use super::config::connect;
use super::executor::{ScriptOutcome, execute_script};
use super::transaction::{begin_transaction, commit, rollback, rollback_after};
use crate::config::DbSettings;
use crate::error::SqlRunnerError;
use crate::script::SqlScript;

/// The steps a script run needs from a connection.
#[async_trait]
pub trait ScriptSession: Send {
    async fn begin(&mut self) -> Result<(), SqlRunnerError>;

    /// Run every statement of `sql` and walk the result sets.
    async fn execute(&mut self, sql: &str) -> Result<ScriptOutcome, SqlRunnerError>;

    async fn commit(&mut self) -> Result<(), SqlRunnerError>;

    async fn rollback(&mut self) -> Result<(), SqlRunnerError>;

    /// Release the connection. Failures are logged, never returned.
    async fn close(self)
    where
        Self: Sized;
}

/// The one connection a run owns, from connect to close.
///
/// Dropping a session without calling [`ScriptSession::close`] still releases the socket,
/// but skips the orderly `COM_QUIT`.
pub struct MariaDbSession {
    conn: Conn,
}

impl MariaDbSession {
    /// Connect using the given settings.
    ///
    /// # Errors
    /// Returns `SqlRunnerError::Database` if the connection cannot be opened.
    pub async fn connect(settings: &DbSettings) -> Result<Self, SqlRunnerError> {
        let conn = connect(settings).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl ScriptSession for MariaDbSession {
    async fn begin(&mut self) -> Result<(), SqlRunnerError> {
        begin_transaction(&mut self.conn).await
    }

    async fn execute(&mut self, sql: &str) -> Result<ScriptOutcome, SqlRunnerError> {
        execute_script(&mut self.conn, sql).await
    }

    async fn commit(&mut self) -> Result<(), SqlRunnerError> {
        commit(&mut self.conn).await
    }

    async fn rollback(&mut self) -> Result<(), SqlRunnerError> {
        rollback(&mut self.conn).await
    }

    async fn close(self) {
        tracing::info!("Closing MariaDB connection.");
        if let Err(err) = self.conn.disconnect().await {
            tracing::warn!("Error closing MariaDB connection: {err}");
        }
    }
}

/// Run a script inside one transaction: commit when every statement succeeds, roll back
/// otherwise.
///
/// # Errors
/// Returns the error that stopped the script (or the commit). Rollback problems are
/// logged, never returned.
pub async fn run_script<S: ScriptSession>(
    session: &mut S,
    sql: &str,
) -> Result<ScriptOutcome, SqlRunnerError> {
    session.begin().await?;

    match execute_and_commit(session, sql).await {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            rollback_after(session, &err).await;
            Err(err)
        }
    }
}

async fn execute_and_commit<S: ScriptSession>(
    session: &mut S,
    sql: &str,
) -> Result<ScriptOutcome, SqlRunnerError> {
    let outcome = session.execute(sql).await?;
    session.commit().await?;
    tracing::info!(
        "SQL execution completed and transaction committed. Statements: {}, with result sets: {}",
        outcome.statements,
        outcome.tabular_statements
    );
    Ok(outcome)
}

/// Run the script on `session`, then close it whatever the outcome.
///
/// # Errors
/// Returns the error [`run_script`] returned.
pub async fn run_and_close<S: ScriptSession>(
    mut session: S,
    script: &SqlScript,
) -> Result<ScriptOutcome, SqlRunnerError> {
    tracing::info!("Executing SQL from '{}'...", script.path.display());
    let outcome = run_script(&mut session, &script.text).await;
    session.close().await;
    outcome
}

/// Connect, run the script, and close the connection whatever the outcome.
///
/// # Errors
/// Returns the connect error, or the error [`run_script`] returned.
pub async fn run_in_session(
    settings: &DbSettings,
    script: &SqlScript,
) -> Result<ScriptOutcome, SqlRunnerError> {
    let session = MariaDbSession::connect(settings).await?;
    run_and_close(session, script).await
}
