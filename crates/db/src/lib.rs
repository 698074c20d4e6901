//! Database bootstrap for outpost plugins: a connection pool built from
//! store credentials, and a runner for bundled SQL setup scripts.
//!
//! # Invariants
//! - One statement failing never aborts a batch; failing to obtain the
//!   connection always does.
//! - Batches run on one connection inside one explicit transaction and
//!   commit at the end.

mod pool;
mod runner;

pub use pool::{MariaConnection, MariaPool, PoolSettings};
pub use runner::{BatchOutcome, BatchReport, ScriptRunner, SqlConnection, SqlSource, statements};

/// Errors from pool construction and statement execution.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("invalid database url: {0}")]
    Url(#[from] mysql::error::UrlError),
    #[error("sql error: {0}")]
    Sql(#[from] mysql::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;

pub fn crate_info() -> &'static str {
    "outpost-db v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("db"));
    }
}
