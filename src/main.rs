use clap::Parser;

use run_sql::cli::Args;
use run_sql::{logging, runner};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    logging::init();

    if let Err(err) = runner::run(&args).await {
        tracing::error!("{err}");
        if let Some(hint) = err.hint() {
            tracing::error!("{hint}");
        }
        if let run_sql::SqlRunnerError::Serialization { data, .. } = &err {
            tracing::error!("Problematic data: {data}");
        }
        std::process::exit(err.exit_code());
    }
}
