//! Convenient imports for callers and tests.
//!
//! ```rust
//! use run_sql::prelude::*;
//! ```

pub use crate::config::DbSettings;
pub use crate::error::SqlRunnerError;
pub use crate::mariadb::{
    MariaDbSession, ResultSetWalker, ScriptOutcome, ScriptSession, run_in_session,
};
pub use crate::output::render_json;
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::script::SqlScript;
pub use crate::types::RowValues;
