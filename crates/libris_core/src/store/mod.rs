//! Persistence gateway: the only component that talks to SQLite.
//!
//! # Responsibility
//! - Own the single lazily-opened database connection.
//! - Execute parameterized statements and return raw rows.
//! - Convert every storage failure into a `false`/`None` signal plus a log line.
//!
//! # Invariants
//! - Statement values are always bound as positional parameters.
//! - Public gateway calls never return `Err` and never panic.
//! - Schema is expected to exist; the gateway never creates or migrates it.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod config;
mod gateway;

pub use config::{StoreConfig, StoreTarget};
pub use gateway::SqliteGateway;

use crate::model::record::{FieldValue, Row};

pub type StoreResult<T> = Result<T, StoreError>;

/// Structured cause behind a failed gateway call.
#[derive(Debug)]
pub enum StoreError {
    /// Connection could not be opened or bootstrapped.
    Connect(rusqlite::Error),
    /// Statement failed to prepare, bind, run or decode.
    Statement(rusqlite::Error),
}

impl StoreError {
    /// Stable code used in log events.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Connect(_) => "db_connect_failed",
            Self::Statement(_) => "db_statement_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect(err) => write!(f, "cannot connect to catalog store: {err}"),
            Self::Statement(err) => write!(f, "catalog statement failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connect(err) | Self::Statement(err) => Some(err),
        }
    }
}

/// Gateway contract used by the catalog service.
///
/// Implementations swallow failures: writes report `false`, reads report
/// `None`. Callers that need the cause ask the concrete gateway.
pub trait CatalogStore {
    /// Runs a write statement and commits it.
    fn execute(&mut self, statement: &str, params: &[FieldValue]) -> bool;

    /// Runs a read statement and returns every row, or `None` on failure.
    fn fetch_all(&mut self, statement: &str, params: &[FieldValue]) -> Option<Vec<Row>>;

    /// Runs a read statement and returns its first row.
    ///
    /// `None` covers both failure and an empty result.
    fn fetch_one(&mut self, statement: &str, params: &[FieldValue]) -> Option<Row>;

    /// Releases the connection. Safe to call repeatedly.
    fn close(&mut self);
}

impl<S: CatalogStore + ?Sized> CatalogStore for &mut S {
    fn execute(&mut self, statement: &str, params: &[FieldValue]) -> bool {
        (**self).execute(statement, params)
    }

    fn fetch_all(&mut self, statement: &str, params: &[FieldValue]) -> Option<Vec<Row>> {
        (**self).fetch_all(statement, params)
    }

    fn fetch_one(&mut self, statement: &str, params: &[FieldValue]) -> Option<Row> {
        (**self).fetch_one(statement, params)
    }

    fn close(&mut self) {
        (**self).close()
    }
}
