use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::SqlRunnerError;

pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_ENV_FILE: &str = ".env";

const HOST_VAR: &str = "DB_HOST";
const USER_VAR: &str = "DB_USER";
const PASSWORD_VAR: &str = "DB_PASSWORD";
const NAME_VAR: &str = "DB_NAME";
const PORT_VAR: &str = "DB_PORT";

/// Connection settings for the target MariaDB server.
///
/// Built once at start-up and handed by reference to whatever needs it.
#[derive(Clone, PartialEq, Eq)]
pub struct DbSettings {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub port: u16,
}

impl fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbSettings")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("port", &self.port)
            .finish()
    }
}

impl DbSettings {
    /// Load settings from the process environment, using `./.env` for anything unset.
    ///
    /// # Errors
    /// Returns `SqlRunnerError::Config` if a required variable is missing, the port does not
    /// parse, or the `.env` file exists but cannot be parsed.
    pub fn from_env() -> Result<Self, SqlRunnerError> {
        Self::from_env_file(DEFAULT_ENV_FILE)
    }

    /// Load settings from the process environment, using the given dotenv file for
    /// anything unset. A missing file is treated as empty.
    ///
    /// # Errors
    /// Same as [`DbSettings::from_env`].
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, SqlRunnerError> {
        let dotenv = read_env_file(path.as_ref())?;
        // vars() panics on non-UTF-8 entries; those can't be ours anyway
        let env = std::env::vars_os().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        });
        Self::from_sources(env, dotenv)
    }

    /// Merge two key/value sources. Keys match case-insensitively and `env` wins over
    /// `dotenv`; unknown keys are ignored.
    ///
    /// # Errors
    /// Returns `SqlRunnerError::Config` naming every missing required variable, or the
    /// offending `DB_PORT` value.
    pub fn from_sources<E, D>(env: E, dotenv: D) -> Result<Self, SqlRunnerError>
    where
        E: IntoIterator<Item = (String, String)>,
        D: IntoIterator<Item = (String, String)>,
    {
        let mut merged: HashMap<String, String> = HashMap::new();
        for (key, value) in dotenv {
            merged.insert(key.to_ascii_uppercase(), value);
        }
        for (key, value) in env {
            merged.insert(key.to_ascii_uppercase(), value);
        }

        let mut missing = Vec::new();
        let mut take = |name: &'static str| {
            let value = merged.remove(name);
            if value.is_none() {
                missing.push(name);
            }
            value.unwrap_or_default()
        };
        let host = take(HOST_VAR);
        let user = take(USER_VAR);
        let password = take(PASSWORD_VAR);
        let database = take(NAME_VAR);

        if !missing.is_empty() {
            return Err(SqlRunnerError::Config(format!(
                "missing required setting(s): {}",
                missing.join(", ")
            )));
        }

        let port = match merged.get(PORT_VAR) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                SqlRunnerError::Config(format!(
                    "{PORT_VAR} must be a port number, got '{raw}': {e}"
                ))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(DbSettings {
            host,
            user,
            password,
            database,
            port,
        })
    }
}

#[allow(deprecated)]
fn read_env_file(path: &Path) -> Result<Vec<(String, String)>, SqlRunnerError> {
    let iter = match dotenv::from_path_iter(path) {
        Ok(iter) => iter,
        Err(dotenv::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Vec::new());
        }
        Err(err) => {
            return Err(SqlRunnerError::Config(format!(
                "could not read {}: {err}",
                path.display()
            )));
        }
    };

    iter.collect::<Result<Vec<_>, _>>().map_err(|err| {
        SqlRunnerError::Config(format!("could not parse {}: {err}", path.display()))
    })
}
