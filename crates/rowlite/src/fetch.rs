//! Row fetching: cursors to ordered records.

use crate::connection::{Connection, Cursor};
use crate::error::{QueryError, QueryResult};
use crate::record::{Record, ResultSet};
use crate::value::Value;

/// Turns a cursor into records keyed by column name.
///
/// Column names come from the cursor's own result description. When no
/// result is at hand yet (validating a WHERE clause's keys, checking
/// unique-group members), use [`Fetcher::probe`], which discovers the
/// columns of a table through a zero-row probe query.
#[derive(Debug)]
pub struct Fetcher {
    columns: Vec<String>,
    cursor: Cursor,
}

impl Fetcher {
    /// Wrap a cursor, taking column names from its description.
    pub fn new(cursor: Cursor) -> Self {
        Self {
            columns: cursor.columns().to_vec(),
            cursor,
        }
    }

    /// Discover a table's columns via `SELECT * FROM <table> WHERE 0`.
    pub fn probe<C: Connection>(conn: &C, table: &str) -> QueryResult<Self> {
        let cursor = conn.execute(&format!("SELECT * FROM {table} WHERE 0"))?;
        Ok(Self::new(cursor))
    }

    /// Column names in projection order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// True if the result has a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Fetch the first row as a record, or `None` if the result is empty.
    ///
    /// With `reverse` set, the full set is drained and the **last** row is
    /// returned instead.
    pub fn first(&mut self, reverse: bool) -> QueryResult<Option<Record>> {
        let raw = if reverse {
            self.cursor.fetch_all().pop()
        } else {
            self.cursor.fetch_one()
        };
        raw.map(|row| self.format_row(row)).transpose()
    }

    /// Fetch every remaining row as a record sequence.
    pub fn all(&mut self) -> QueryResult<ResultSet> {
        self.cursor
            .fetch_all()
            .into_iter()
            .map(|row| self.format_row(row))
            .collect()
    }

    fn format_row(&self, raw: Vec<Value>) -> QueryResult<Record> {
        if raw.len() != self.columns.len() {
            return Err(QueryError::FormatWidth {
                expected: self.columns.len(),
                got: raw.len(),
            });
        }
        Ok(self.columns.iter().cloned().zip(raw).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;
    use crate::testing::FakeConnection;

    fn people_cursor() -> Cursor {
        Cursor::new(
            vec!["id".into(), "name".into()],
            vec![
                vec![Value::Int(1), Value::Text("a".into())],
                vec![Value::Int(999), Value::Text("b".into())],
            ],
        )
    }

    #[test]
    fn all_keys_rows_by_column_name() {
        let mut fetcher = Fetcher::new(people_cursor());
        let rows = fetcher.all().unwrap();
        assert_eq!(
            rows,
            vec![
                record! { "id" => 1, "name" => "a" },
                record! { "id" => 999, "name" => "b" },
            ]
        );
    }

    #[test]
    fn first_returns_first_row() {
        let mut fetcher = Fetcher::new(people_cursor());
        let row = fetcher.first(false).unwrap();
        assert_eq!(row, Some(record! { "id" => 1, "name" => "a" }));
    }

    #[test]
    fn first_reverse_returns_last_row() {
        let mut fetcher = Fetcher::new(people_cursor());
        let row = fetcher.first(true).unwrap();
        assert_eq!(row, Some(record! { "id" => 999, "name" => "b" }));
    }

    #[test]
    fn first_on_empty_result_is_none() {
        let mut fetcher = Fetcher::new(Cursor::new(vec!["id".into()], vec![]));
        assert_eq!(fetcher.first(false).unwrap(), None);
        assert_eq!(fetcher.first(true).unwrap(), None);
    }

    #[test]
    fn width_mismatch_is_a_format_error() {
        let cursor = Cursor::new(vec!["id".into(), "name".into()], vec![vec![Value::Int(1)]]);
        let mut fetcher = Fetcher::new(cursor);
        let err = fetcher.all().unwrap_err();
        assert!(matches!(
            err,
            QueryError::FormatWidth {
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn probe_discovers_columns_with_zero_row_query() {
        let conn = FakeConnection::new();
        conn.reply_rows(&["id", "name", "age"], vec![]);
        let fetcher = Fetcher::probe(&conn, "users").unwrap();
        assert_eq!(fetcher.columns(), ["id", "name", "age"]);
        assert!(fetcher.has_column("age"));
        assert!(!fetcher.has_column("missing"));
        assert_eq!(conn.executed(), vec!["SELECT * FROM users WHERE 0"]);
    }
}
