use mysql_async::{Conn, Opts, OptsBuilder};

use crate::config::DbSettings;
use crate::error::SqlRunnerError;

impl DbSettings {
    /// Driver options for these settings.
    #[must_use]
    pub fn connect_options(&self) -> Opts {
        OptsBuilder::default()
            .ip_or_hostname(self.host.clone())
            .tcp_port(self.port)
            .user(Some(self.user.clone()))
            .pass(Some(self.password.clone()))
            .db_name(Some(self.database.clone()))
            .into()
    }
}

/// Open the single connection a run uses.
///
/// # Errors
/// Returns `SqlRunnerError::Database` if the server cannot be reached or rejects the login.
pub async fn connect(settings: &DbSettings) -> Result<Conn, SqlRunnerError> {
    tracing::info!(
        "Connecting to MariaDB: host={}, port={}, database='{}', user='{}'...",
        settings.host,
        settings.port,
        settings.database,
        settings.user
    );
    let conn = Conn::new(settings.connect_options()).await?;
    Ok(conn)
}
