//! SQLite-backed catalog gateway.
//!
//! # Responsibility
//! - Open the database lazily and memoize the handle.
//! - Probe a memoized handle before reuse and reopen it when the probe fails.
//! - Bind `FieldValue`s as positional parameters and decode rows back into them.
//!
//! # Invariants
//! - At most one `Connection` is held at a time.
//! - File targets are opened read-write without the create flag.
//! - Each write runs in autocommit mode; there are no explicit transactions.

use super::{CatalogStore, StoreConfig, StoreError, StoreResult, StoreTarget};
use crate::model::record::{FieldValue, Row};
use log::{debug, error, info, warn};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, OpenFlags, ToSql};
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Gateway owning the process-wide catalog connection.
pub struct SqliteGateway {
    config: StoreConfig,
    conn: Option<Connection>,
    last_error: Option<StoreError>,
}

impl SqliteGateway {
    /// Creates a gateway. No connection is opened until the first call.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            conn: None,
            last_error: None,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Whether a connection handle is currently held.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Cause of the most recent failed call; cleared by the next success.
    pub fn last_error(&self) -> Option<&StoreError> {
        self.last_error.as_ref()
    }

    fn connection(&mut self) -> StoreResult<&Connection> {
        if let Some(conn) = self.conn.take() {
            if is_alive(&conn) {
                return Ok(&*self.conn.insert(conn));
            }
            warn!(
                "event=db_reconnect module=store status=start mode={} reason=probe_failed",
                self.config.mode()
            );
        }

        let conn = open_connection(&self.config)?;
        Ok(&*self.conn.insert(conn))
    }

    fn try_execute(&mut self, statement: &str, params: &[FieldValue]) -> StoreResult<usize> {
        let conn = self.connection()?;
        conn.execute(statement, params_from_iter(params.iter()))
            .map_err(StoreError::Statement)
    }

    fn try_fetch_all(&mut self, statement: &str, params: &[FieldValue]) -> StoreResult<Vec<Row>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(statement).map_err(StoreError::Statement)?;
        let column_count = stmt.column_count();
        let mut rows = stmt
            .query(params_from_iter(params.iter()))
            .map_err(StoreError::Statement)?;

        let mut collected = Vec::new();
        while let Some(row) = rows.next().map_err(StoreError::Statement)? {
            collected.push(read_row(row, column_count)?);
        }
        Ok(collected)
    }

    fn try_fetch_one(
        &mut self,
        statement: &str,
        params: &[FieldValue],
    ) -> StoreResult<Option<Row>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(statement).map_err(StoreError::Statement)?;
        let column_count = stmt.column_count();
        let mut rows = stmt
            .query(params_from_iter(params.iter()))
            .map_err(StoreError::Statement)?;

        let first = match rows.next().map_err(StoreError::Statement)? {
            Some(row) => Some(read_row(row, column_count)?),
            None => None,
        };
        Ok(first)
    }

    fn record_failure(&mut self, event: &str, started_at: Instant, err: StoreError) {
        error!(
            "event={} module=store status=error mode={} duration_ms={} error_code={} error={}",
            event,
            self.config.mode(),
            started_at.elapsed().as_millis(),
            err.error_code(),
            err
        );
        self.last_error = Some(err);
    }

    fn release(&mut self) {
        let Some(conn) = self.conn.take() else {
            debug!("event=db_close module=store status=skipped reason=not_open");
            return;
        };

        match conn.close() {
            Ok(()) => info!(
                "event=db_close module=store status=ok mode={}",
                self.config.mode()
            ),
            Err((_conn, err)) => warn!(
                "event=db_close module=store status=error mode={} error={}",
                self.config.mode(),
                err
            ),
        }
    }
}

impl CatalogStore for SqliteGateway {
    fn execute(&mut self, statement: &str, params: &[FieldValue]) -> bool {
        let started_at = Instant::now();
        match self.try_execute(statement, params) {
            Ok(changed) => {
                debug!(
                    "event=db_execute module=store status=ok rows_affected={} duration_ms={}",
                    changed,
                    started_at.elapsed().as_millis()
                );
                self.last_error = None;
                true
            }
            Err(err) => {
                self.record_failure("db_execute", started_at, err);
                false
            }
        }
    }

    fn fetch_all(&mut self, statement: &str, params: &[FieldValue]) -> Option<Vec<Row>> {
        let started_at = Instant::now();
        match self.try_fetch_all(statement, params) {
            Ok(rows) => {
                debug!(
                    "event=db_fetch_all module=store status=ok rows={} duration_ms={}",
                    rows.len(),
                    started_at.elapsed().as_millis()
                );
                self.last_error = None;
                Some(rows)
            }
            Err(err) => {
                self.record_failure("db_fetch_all", started_at, err);
                None
            }
        }
    }

    fn fetch_one(&mut self, statement: &str, params: &[FieldValue]) -> Option<Row> {
        let started_at = Instant::now();
        match self.try_fetch_one(statement, params) {
            Ok(row) => {
                debug!(
                    "event=db_fetch_one module=store status=ok found={} duration_ms={}",
                    row.is_some(),
                    started_at.elapsed().as_millis()
                );
                self.last_error = None;
                row
            }
            Err(err) => {
                self.record_failure("db_fetch_one", started_at, err);
                None
            }
        }
    }

    fn close(&mut self) {
        self.release();
    }
}

impl Drop for SqliteGateway {
    fn drop(&mut self) {
        if self.conn.is_some() {
            self.release();
        }
    }
}

fn open_connection(config: &StoreConfig) -> StoreResult<Connection> {
    let started_at = Instant::now();
    let mode = config.mode();
    info!("event=db_open module=store status=start mode={mode}");

    let opened = match config.target() {
        StoreTarget::File(path) => Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        ),
        StoreTarget::Memory => Connection::open_in_memory(),
    };

    let conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=store status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(StoreError::Connect(err));
        }
    };

    match bootstrap_connection(&conn) {
        Ok(()) => {
            info!(
                "event=db_open module=store status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=store status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(StoreError::Connect(err))
        }
    }
}

fn bootstrap_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}

fn is_alive(conn: &Connection) -> bool {
    conn.query_row("SELECT 1;", [], |row| row.get::<_, i64>(0))
        .is_ok()
}

fn read_row(row: &rusqlite::Row<'_>, column_count: usize) -> StoreResult<Row> {
    (0..column_count)
        .map(|index| row.get::<_, FieldValue>(index).map_err(StoreError::Statement))
        .collect()
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Owned(Value::Null),
            Self::Integer(value) => ToSqlOutput::Owned(Value::Integer(*value)),
            Self::Real(value) => ToSqlOutput::Owned(Value::Real(*value)),
            Self::Text(value) => ToSqlOutput::Borrowed(ValueRef::Text(value.as_bytes())),
        })
    }
}

impl FromSql for FieldValue {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(Self::Null),
            ValueRef::Integer(value) => Ok(Self::Integer(value)),
            ValueRef::Real(value) => Ok(Self::Real(value)),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map(|text| Self::Text(text.to_string()))
                .map_err(|err| FromSqlError::Other(Box::new(err))),
            ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteGateway;
    use crate::model::record::FieldValue;
    use crate::store::{CatalogStore, StoreConfig};

    #[test]
    fn gateway_is_lazy_until_first_call() {
        let mut gateway = SqliteGateway::new(StoreConfig::in_memory());
        assert!(!gateway.is_open());

        let row = gateway.fetch_one("SELECT 1, 'one';", &[]).unwrap();
        assert!(gateway.is_open());
        assert_eq!(
            row,
            vec![FieldValue::Integer(1), FieldValue::Text("one".to_string())]
        );
    }

    #[test]
    fn failed_statement_is_recorded_and_cleared_by_success() {
        let mut gateway = SqliteGateway::new(StoreConfig::in_memory());

        assert!(!gateway.execute("INSERT INTO missing_table VALUES (?);", &[FieldValue::Integer(1)]));
        let err = gateway.last_error().expect("failure should be recorded");
        assert_eq!(err.error_code(), "db_statement_failed");

        assert!(gateway.execute("CREATE TABLE t (v INTEGER);", &[]));
        assert!(gateway.last_error().is_none());
    }

    #[test]
    fn blob_columns_fail_the_read() {
        let mut gateway = SqliteGateway::new(StoreConfig::in_memory());
        assert!(gateway.fetch_all("SELECT x'00';", &[]).is_none());
    }
}
