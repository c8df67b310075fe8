//! Run a SQL script against MariaDB and print the rows of its last SELECT as JSON.
//!
//! The binary is a thin wrapper around [`runner::run`]; the pieces are public so the
//! result-walking and JSON rendering can be tested without a server.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod mariadb;
pub mod output;
pub mod prelude;
pub mod results;
pub mod runner;
pub mod script;
pub mod types;

pub use config::DbSettings;
pub use error::SqlRunnerError;
pub use results::{CustomDbRow, ResultSet};
pub use script::SqlScript;
pub use types::RowValues;
