#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use run_sql::DbSettings;

/// Settings for a live MariaDB, if the environment provides them.
///
/// Tests that need a server return early when this is `None`.
pub fn live_settings() -> Option<DbSettings> {
    match DbSettings::from_env() {
        Ok(settings) => Some(settings),
        Err(err) => {
            eprintln!("skipping live MariaDB test: {err}");
            None
        }
    }
}

pub fn write_script(dir: &Path, name: &str, sql: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, sql).expect("write script");
    path
}

/// Run the binary from `cwd` with only the given variables set.
pub fn run_binary(cwd: &Path, sql_file: &Path, vars: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_run-sql"));
    cmd.env_clear().current_dir(cwd).arg(sql_file);
    for (key, value) in vars {
        cmd.env(key, value);
    }
    cmd.output().expect("spawn run-sql")
}

/// Settings that pass validation but point at a port nothing listens on.
pub const UNREACHABLE_DB: &[(&str, &str)] = &[
    ("DB_HOST", "127.0.0.1"),
    ("DB_PORT", "9"),
    ("DB_USER", "nobody"),
    ("DB_PASSWORD", "nothing"),
    ("DB_NAME", "none"),
];
