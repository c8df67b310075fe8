use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    about = "Run SQL from a file against a MariaDB database and output results of the last SELECT query."
)]
pub struct Args {
    /// Path to the SQL file to execute.
    pub sql_file: PathBuf,
}
