use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::SqlRunnerError;

/// The SQL text read from a script file, passed to the server unmodified.
#[derive(Debug, Clone)]
pub struct SqlScript {
    pub path: PathBuf,
    pub text: String,
}

impl SqlScript {
    /// Read a script file.
    ///
    /// # Errors
    /// `FileNotFound` when the path does not exist, `FileRead` for any other I/O failure
    /// (including non-UTF-8 content), `EmptyScript` when the file holds only whitespace.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SqlRunnerError> {
        let path = path.as_ref().to_path_buf();
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                return Err(SqlRunnerError::FileNotFound { path });
            }
            Err(source) => return Err(SqlRunnerError::FileRead { path, source }),
        };

        if text.trim().is_empty() {
            return Err(SqlRunnerError::EmptyScript { path });
        }

        Ok(SqlScript { path, text })
    }
}
