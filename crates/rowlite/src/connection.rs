//! The connection seam.
//!
//! The query layer never touches a concrete driver. It depends on the
//! [`Connection`] trait, which models the minimal sqlite-style surface the
//! engine needs: execute a statement, commit, close. Statements auto-commit
//! individually; [`Connection::execute_deferred`] lets a driver batch several
//! statements under one explicit [`Connection::commit`].
//!
//! Results come back as a buffered [`Cursor`]: the result description
//! (ordered column names) plus the raw rows.

use crate::error::{DriverError, DriverResult};
use crate::value::Value;
use std::collections::VecDeque;

/// A buffered result handle: ordered column names plus raw rows.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    columns: Vec<String>,
    rows: VecDeque<Vec<Value>>,
}

impl Cursor {
    /// Create a cursor from a result description and its rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            rows: rows.into(),
        }
    }

    /// A cursor with no description and no rows (non-query statements).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The result description: column names in projection order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Fetch the next raw row, if any.
    pub fn fetch_one(&mut self) -> Option<Vec<Value>> {
        self.rows.pop_front()
    }

    /// Drain all remaining raw rows.
    pub fn fetch_all(&mut self) -> Vec<Vec<Value>> {
        self.rows.drain(..).collect()
    }

    /// Number of buffered rows remaining.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

/// A synchronous database connection.
///
/// The engine is single-connection and blocking: every call runs to
/// completion on the calling thread. The connection is externally owned; the
/// engine never closes it except when [`Engine::close`](crate::Engine::close)
/// is called explicitly.
pub trait Connection {
    /// Execute one statement and commit it.
    fn execute(&self, sql: &str) -> DriverResult<Cursor>;

    /// Execute one statement without committing.
    ///
    /// Callers batch several of these under one [`Connection::commit`].
    /// Drivers without manual commit control may leave the default, which
    /// falls back to [`Connection::execute`].
    fn execute_deferred(&self, sql: &str) -> DriverResult<Cursor> {
        self.execute(sql)
    }

    /// Execute a statement with `?` placeholders bound to `params`.
    ///
    /// This is the parameterized safe-mode path; drivers that cannot bind
    /// parameters keep the default and the engine surfaces the error.
    fn execute_with_params(&self, sql: &str, params: &[Value]) -> DriverResult<Cursor> {
        let _ = (sql, params);
        Err(DriverError::Unsupported(
            "parameter binding is not supported by this driver".to_string(),
        ))
    }

    /// Commit any deferred statements.
    fn commit(&self) -> DriverResult<()>;

    /// Close the connection.
    fn close(&self) -> DriverResult<()>;
}
