// MariaDB module - everything that touches the server
//
// - config: driver options and opening the connection
// - connection: the `ScriptSession` seam, the session that owns the connection, and the
//   begin / run / commit-or-rollback / close flow
// - transaction: begin / commit / rollback statements
// - executor: running a script and walking its result sets
// - query: converting driver rows into `RowValues`

pub mod config;
pub mod connection;
pub mod executor;
pub mod query;
pub mod transaction;

pub use connection::{MariaDbSession, ScriptSession, run_and_close, run_in_session, run_script};
pub use executor::{ResultSetWalker, ScriptOutcome, execute_script, should_log_executed};
pub use query::{build_result_set, extract_row_values, mariadb_extract_value};
