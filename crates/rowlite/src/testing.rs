//! Scripted connection double for fixture tests.

use crate::connection::{Connection, Cursor};
use crate::error::{DriverError, DriverResult};
use crate::value::Value;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

enum Reply {
    Rows(Vec<String>, Vec<Vec<Value>>),
    Fail(DriverError),
}

/// Records every executed statement and replays queued replies in order.
///
/// When the reply queue is empty a statement succeeds with an empty cursor,
/// so non-query statements need no scripting.
#[derive(Default)]
pub(crate) struct FakeConnection {
    replies: RefCell<VecDeque<Reply>>,
    log: RefCell<Vec<String>>,
    param_log: RefCell<Vec<Vec<Value>>>,
    commits: Cell<usize>,
    closed: Cell<bool>,
}

impl FakeConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result cursor for the next executed statement.
    pub fn reply_rows(&self, columns: &[&str], rows: Vec<Vec<Value>>) {
        self.replies.borrow_mut().push_back(Reply::Rows(
            columns.iter().map(|c| c.to_string()).collect(),
            rows,
        ));
    }

    /// Queue a driver error for the next executed statement.
    pub fn reply_err(&self, err: DriverError) {
        self.replies.borrow_mut().push_back(Reply::Fail(err));
    }

    /// Every statement executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    /// Parameters bound by `execute_with_params` calls, in order.
    pub fn bound_params(&self) -> Vec<Vec<Value>> {
        self.param_log.borrow().clone()
    }

    pub fn commit_count(&self) -> usize {
        self.commits.get()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    fn run(&self, sql: &str) -> DriverResult<Cursor> {
        self.log.borrow_mut().push(sql.to_string());
        match self.replies.borrow_mut().pop_front() {
            Some(Reply::Rows(columns, rows)) => Ok(Cursor::new(columns, rows)),
            Some(Reply::Fail(err)) => Err(err),
            None => Ok(Cursor::empty()),
        }
    }
}

impl Connection for FakeConnection {
    fn execute(&self, sql: &str) -> DriverResult<Cursor> {
        self.run(sql)
    }

    fn execute_with_params(&self, sql: &str, params: &[Value]) -> DriverResult<Cursor> {
        self.param_log.borrow_mut().push(params.to_vec());
        self.run(sql)
    }

    fn commit(&self) -> DriverResult<()> {
        self.commits.set(self.commits.get() + 1);
        Ok(())
    }

    fn close(&self) -> DriverResult<()> {
        self.closed.set(true);
        Ok(())
    }
}
