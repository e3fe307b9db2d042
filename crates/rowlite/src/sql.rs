//! SQL statement assembly.
//!
//! Every statement the engine executes is built here, so the observable
//! query text stays testable with plain string fixtures. The default
//! [`SqlMode::Literal`] embeds values directly: integers bare, text quoted
//! with no escaping. [`SqlMode::Parameterized`] is the explicitly labeled safe mode: it
//! emits `?` placeholders and carries the values alongside the text for
//! [`Connection::execute_with_params`](crate::Connection::execute_with_params).

use crate::record::Record;
use crate::value::Value;

/// How values reach the statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlMode {
    /// Embed values as literals (default; no escaping, documented hazard)
    #[default]
    Literal,
    /// Emit `?` placeholders and bind values at execution
    Parameterized,
}

/// A built statement: text plus the parameters it binds (empty in literal
/// mode).
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }

    /// A statement with no bound parameters.
    pub fn literal(sql: impl Into<String>) -> Self {
        Self::new(sql.into(), Vec::new())
    }
}

enum LiteralStyle {
    /// WHERE clauses: integers and floats bare
    Condition,
    /// INSERT/SET: only integers bare
    Write,
}

fn push_value(value: &Value, style: &LiteralStyle, mode: SqlMode, params: &mut Vec<Value>) -> String {
    match mode {
        SqlMode::Literal => match style {
            LiteralStyle::Condition => value.condition_literal(),
            LiteralStyle::Write => value.write_literal(),
        },
        SqlMode::Parameterized => {
            params.push(value.clone());
            "?".to_string()
        }
    }
}

/// Build an AND-joined equality clause: `a = 1 and b = 'x'`.
pub fn equality_clause(cond: &Record, mode: SqlMode, params: &mut Vec<Value>) -> String {
    cond.iter()
        .map(|(column, value)| {
            format!(
                "{column} = {}",
                push_value(value, &LiteralStyle::Condition, mode, params)
            )
        })
        .collect::<Vec<_>>()
        .join(" and ")
}

fn set_clause(data: &Record, mode: SqlMode, params: &mut Vec<Value>) -> String {
    data.iter()
        .map(|(column, value)| {
            format!(
                "{column}={}",
                push_value(value, &LiteralStyle::Write, mode, params)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// The `ORDER BY`/`LIMIT` suffix; `limit == 0` means no limit.
pub fn suffix(order_by: Option<&str>, limit: u64) -> String {
    let mut out = String::new();
    if let Some(column) = order_by {
        out.push_str(&format!(" ORDER BY {column}"));
    }
    if limit > 0 {
        out.push_str(&format!(" LIMIT {limit}"));
    }
    out
}

/// `CREATE TABLE [IF NOT EXISTS] <table> (<columns>)`
pub fn create_table(table: &str, columns: &str, if_not_exists: bool) -> Statement {
    let sql = if if_not_exists {
        format!("CREATE TABLE IF NOT EXISTS {table} ({columns})")
    } else {
        format!("CREATE TABLE {table} ({columns})")
    };
    Statement::literal(sql)
}

/// `DROP TABLE <table>`
pub fn drop_table(table: &str) -> Statement {
    Statement::literal(format!("DROP TABLE {table}"))
}

/// `INSERT INTO <table> VALUES (...)`, values in the order `data` was given.
pub fn insert(table: &str, data: &Record, mode: SqlMode) -> Statement {
    let mut params = Vec::new();
    let values = data
        .iter()
        .map(|(_, value)| push_value(value, &LiteralStyle::Write, mode, &mut params))
        .collect::<Vec<_>>()
        .join(",");
    Statement::new(format!("INSERT INTO {table} VALUES ({values})"), params)
}

/// `UPDATE <table> SET ... [where ...]`
pub fn update(table: &str, data: &Record, cond: Option<&Record>, mode: SqlMode) -> Statement {
    let mut params = Vec::new();
    let set = set_clause(data, mode, &mut params);
    let sql = match cond {
        Some(cond) => {
            let clause = equality_clause(cond, mode, &mut params);
            format!("UPDATE {table} SET {set} where {clause}")
        }
        None => format!("UPDATE {table} SET {set}"),
    };
    Statement::new(sql, params)
}

/// `DELETE FROM <table> [where ...]`; no condition deletes every row.
pub fn delete(table: &str, cond: Option<&Record>, mode: SqlMode) -> Statement {
    match cond {
        Some(cond) => {
            let mut params = Vec::new();
            let clause = equality_clause(cond, mode, &mut params);
            Statement::new(format!("DELETE FROM {table} where {clause}"), params)
        }
        None => Statement::literal(format!("DELETE FROM {table}")),
    }
}

/// `SELECT <projection> FROM <table> [where ...] [ORDER BY ...] [LIMIT n]`
pub fn select(
    projection: &str,
    table: &str,
    cond: Option<&Record>,
    order_by: Option<&str>,
    limit: u64,
    mode: SqlMode,
) -> Statement {
    let tail = suffix(order_by, limit);
    match cond {
        Some(cond) => {
            let mut params = Vec::new();
            let clause = equality_clause(cond, mode, &mut params);
            Statement::new(
                format!("SELECT {projection} FROM {table} where {clause}{tail}"),
                params,
            )
        }
        None => Statement::literal(format!("SELECT {projection} FROM {table}{tail}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    #[test]
    fn insert_embeds_values_in_data_order() {
        let stmt = insert(
            "users",
            &record! { "id" => 1, "name" => "a", "age" => 20 },
            SqlMode::Literal,
        );
        assert_eq!(stmt.sql, "INSERT INTO users VALUES (1,'a',20)");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn insert_quotes_floats() {
        let stmt = insert("items", &record! { "price" => 1.5 }, SqlMode::Literal);
        assert_eq!(stmt.sql, "INSERT INTO items VALUES ('1.5')");
    }

    #[test]
    fn insert_parameterized() {
        let stmt = insert(
            "users",
            &record! { "id" => 1, "name" => "a" },
            SqlMode::Parameterized,
        );
        assert_eq!(stmt.sql, "INSERT INTO users VALUES (?,?)");
        assert_eq!(stmt.params, vec![Value::Int(1), Value::Text("a".into())]);
    }

    #[test]
    fn select_with_condition_and_suffix() {
        let stmt = select(
            "*",
            "users",
            Some(&record! { "id" => 1, "name" => "a" }),
            Some("id"),
            2,
            SqlMode::Literal,
        );
        assert_eq!(
            stmt.sql,
            "SELECT * FROM users where id = 1 and name = 'a' ORDER BY id LIMIT 2"
        );
    }

    #[test]
    fn select_plain_projection() {
        let stmt = select("id", "users", None, None, 0, SqlMode::Literal);
        assert_eq!(stmt.sql, "SELECT id FROM users");
    }

    #[test]
    fn conditions_leave_floats_bare() {
        let stmt = select(
            "*",
            "items",
            Some(&record! { "price" => 1.5 }),
            None,
            0,
            SqlMode::Literal,
        );
        assert_eq!(stmt.sql, "SELECT * FROM items where price = 1.5");
    }

    #[test]
    fn update_with_condition() {
        let stmt = update(
            "users",
            &record! { "age" => 21, "name" => "b" },
            Some(&record! { "id" => 1 }),
            SqlMode::Literal,
        );
        assert_eq!(stmt.sql, "UPDATE users SET age=21, name='b' where id = 1");
    }

    #[test]
    fn update_all_rows() {
        let stmt = update("users", &record! { "age" => 21 }, None, SqlMode::Literal);
        assert_eq!(stmt.sql, "UPDATE users SET age=21");
    }

    #[test]
    fn update_parameterized_binds_set_then_where() {
        let stmt = update(
            "users",
            &record! { "age" => 21 },
            Some(&record! { "id" => 1 }),
            SqlMode::Parameterized,
        );
        assert_eq!(stmt.sql, "UPDATE users SET age=? where id = ?");
        assert_eq!(stmt.params, vec![Value::Int(21), Value::Int(1)]);
    }

    #[test]
    fn delete_with_and_without_condition() {
        let stmt = delete(
            "users",
            Some(&record! { "id" => 1, "age" => 19 }),
            SqlMode::Literal,
        );
        assert_eq!(stmt.sql, "DELETE FROM users where id = 1 and age = 19");
        let stmt = delete("users", None, SqlMode::Literal);
        assert_eq!(stmt.sql, "DELETE FROM users");
    }

    #[test]
    fn create_and_drop() {
        let stmt = create_table("users", "id int primary key, name text", true);
        assert_eq!(
            stmt.sql,
            "CREATE TABLE IF NOT EXISTS users (id int primary key, name text)"
        );
        let stmt = create_table("users", "id int", false);
        assert_eq!(stmt.sql, "CREATE TABLE users (id int)");
        assert_eq!(drop_table("users").sql, "DROP TABLE users");
    }
}
