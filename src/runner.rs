use std::path::Path;

use crate::cli::Args;
use crate::config::DbSettings;
use crate::error::SqlRunnerError;
use crate::mariadb::run_in_session;
use crate::output::{render_json, write_json};
use crate::script::SqlScript;

/// Settings first, then the script: a configuration problem is reported before any file is
/// touched.
///
/// # Errors
/// Whatever `load_settings` or [`SqlScript::load`] returns.
pub fn load_inputs<F>(
    sql_file: &Path,
    load_settings: F,
) -> Result<(DbSettings, SqlScript), SqlRunnerError>
where
    F: FnOnce() -> Result<DbSettings, SqlRunnerError>,
{
    let settings = load_settings()?;
    let script = SqlScript::load(sql_file)?;
    Ok((settings, script))
}

/// Run the script and render the JSON document to print.
///
/// # Errors
/// Database, conversion and serialization errors.
pub async fn execute(settings: &DbSettings, script: &SqlScript) -> Result<String, SqlRunnerError> {
    let outcome = run_in_session(settings, script).await?;
    if !outcome.has_result_set() {
        tracing::info!(
            "No SELECT statements were executed or they produced no structured result sets."
        );
    }
    render_json(&outcome.into_result_set())
}

/// The whole program: load inputs, run, print.
///
/// # Errors
/// Any `SqlRunnerError`; the caller maps it to an exit code.
pub async fn run(args: &Args) -> Result<(), SqlRunnerError> {
    let (settings, script) = load_inputs(&args.sql_file, DbSettings::from_env)?;
    let json = execute(&settings, &script).await?;
    write_json(&mut std::io::stdout().lock(), &json)
}
