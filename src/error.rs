use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlRunnerError {
    #[error("Error loading database settings: {0}")]
    Config(String),

    #[error("Error: SQL file '{}' not found.", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Error reading SQL file '{}': {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SQL file '{}' is empty or contains only whitespace.", .path.display())]
    EmptyScript { path: PathBuf },

    #[error("MariaDB error: {0}")]
    Database(#[from] mysql_async::Error),

    #[error("Value conversion error: {0}")]
    Conversion(String),

    #[error("Error serializing results to JSON: {source}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        /// Debug rendering of the rows that failed to serialize.
        data: String,
    },

    #[error("Error writing output: {0}")]
    Io(#[from] std::io::Error),
}

impl SqlRunnerError {
    /// Process exit status for this error. Every failure category is terminal and maps to 1.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Follow-up line printed after the diagnostic, if the category has one.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            SqlRunnerError::Config(_) => Some(
                "Please ensure DB_USER, DB_PASSWORD, and DB_NAME are set via environment variables or in a .env file.",
            ),
            _ => None,
        }
    }

    /// True for errors raised by the driver, as opposed to failures in our own handling.
    #[must_use]
    pub fn is_database(&self) -> bool {
        matches!(self, SqlRunnerError::Database(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_exits_with_one() {
        let errors = [
            SqlRunnerError::Config("missing DB_USER".into()),
            SqlRunnerError::FileNotFound {
                path: PathBuf::from("nope.sql"),
            },
            SqlRunnerError::EmptyScript {
                path: PathBuf::from("blank.sql"),
            },
            SqlRunnerError::Conversion("bad cell".into()),
            SqlRunnerError::Database(mysql_async::Error::from(std::io::Error::other("reset"))),
        ];
        for err in &errors {
            assert_eq!(err.exit_code(), 1, "{err}");
        }
    }

    #[test]
    fn only_config_errors_carry_a_hint() {
        assert!(SqlRunnerError::Config("x".into()).hint().is_some());
        assert!(
            SqlRunnerError::EmptyScript {
                path: PathBuf::from("a.sql")
            }
            .hint()
            .is_none()
        );
    }

    #[test]
    fn file_messages_name_the_path() {
        let err = SqlRunnerError::FileNotFound {
            path: PathBuf::from("queries/report.sql"),
        };
        assert_eq!(
            err.to_string(),
            "Error: SQL file 'queries/report.sql' not found."
        );
    }
}
