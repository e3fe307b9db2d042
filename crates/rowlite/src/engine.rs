//! The query engine facade.
//!
//! [`Engine`] orchestrates create/insert/update/select/delete over a
//! [`Connection`], composing the schema compiler, statement assembly, row
//! fetching, client-side filtering, and result formatting. It is explicitly
//! constructed and explicitly passed; there is no ambient default instance.
//!
//! Everything is synchronous and blocking; the only multi-statement protocol
//! is the unique-check-then-insert sequence, which is **not** atomic:
//! concurrent callers can both pass the check before either writes. Callers
//! that need a hard guarantee must serialize externally (e.g. with a native
//! uniqueness constraint).

use crate::connection::{Connection, Cursor};
use crate::error::{DriverError, QueryError, QueryResult};
use crate::fetch::Fetcher;
use crate::filter::{self, ColumnPredicate, RegexFilter};
use crate::format::{self, Output, OutputConfig};
use crate::model::{self, Model};
use crate::record::{Record, ResultSet};
use crate::schema::{self, CompiledSchema, TableDef, UniqueGroup};
use crate::sql::{self, SqlMode, Statement};

/// Options for [`Engine::select`] and [`Engine::select_models`].
///
/// ```ignore
/// use rowlite::{record, RegexFilter, SelectOptions};
///
/// let options = SelectOptions::new()
///     .condition(record! { "id" => 1 })
///     .order_by("id")
///     .limit(10);
/// ```
#[derive(Debug, Default)]
pub struct SelectOptions {
    condition: Option<Record>,
    order_by: Option<String>,
    limit: u64,
    filter: Option<ColumnPredicate>,
    regexp: Option<RegexFilter>,
    first_only: bool,
    select_column: Option<String>,
    output: OutputConfig,
}

impl SelectOptions {
    /// Start with defaults: full set, `*` projection, raw records.
    pub fn new() -> Self {
        Self::default()
    }

    /// AND-joined equality condition; every key must be a real column.
    pub fn condition(mut self, cond: Record) -> Self {
        self.condition = Some(cond);
        self
    }

    /// `ORDER BY` column.
    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self
    }

    /// `LIMIT`; 0 means no limit.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Client-side column predicate (fetches the whole table).
    pub fn filter(mut self, filter: ColumnPredicate) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Client-side regex filter (fetches the whole table).
    pub fn regexp(mut self, regexp: RegexFilter) -> Self {
        self.regexp = Some(regexp);
        self
    }

    /// Return only the first row instead of the full set (condition path).
    pub fn first(mut self) -> Self {
        self.first_only = true;
        self
    }

    /// Project a single column instead of `*`.
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.select_column = Some(column.into());
        self
    }

    /// Serialize the result to JSON.
    pub fn as_json(mut self) -> Self {
        self.output.as_json = true;
        self
    }

    /// Convert the result to a column-major frame.
    pub fn as_frame(mut self) -> Self {
        self.output.as_frame = true;
        self
    }

    /// Request model binding. Only valid with [`Engine::select_models`];
    /// on the untyped path this is a configuration error.
    pub fn as_model(mut self) -> Self {
        self.output.as_model = true;
        self
    }
}

enum Fetched {
    All(ResultSet),
    First(Option<Record>),
}

/// The schema-driven query engine over a [`Connection`].
pub struct Engine<C: Connection> {
    conn: C,
    mode: SqlMode,
}

impl<C: Connection> Engine<C> {
    /// Create an engine in literal mode.
    pub fn new(conn: C) -> Self {
        Self::with_mode(conn, SqlMode::Literal)
    }

    /// Create an engine with an explicit [`SqlMode`].
    pub fn with_mode(conn: C, mode: SqlMode) -> Self {
        Self { conn, mode }
    }

    /// The statement mode in effect.
    pub fn mode(&self) -> SqlMode {
        self.mode
    }

    /// Borrow the underlying connection.
    pub fn connection(&self) -> &C {
        &self.conn
    }

    /// Commit statements a driver deferred via
    /// [`Connection::execute_deferred`].
    pub fn commit(&self) -> QueryResult<()> {
        self.conn.commit().map_err(QueryError::from)
    }

    /// Close the underlying connection.
    pub fn close(&self) -> QueryResult<()> {
        self.conn.close().map_err(QueryError::from)
    }

    fn run(&self, stmt: &Statement) -> QueryResult<Cursor> {
        tracing::debug!(sql = %stmt.sql, "execute");
        let result = if stmt.params.is_empty() {
            self.conn.execute(&stmt.sql)
        } else {
            self.conn.execute_with_params(&stmt.sql, &stmt.params)
        };
        result.map_err(QueryError::from)
    }

    /// Every condition key must name a real column of the table.
    fn validate_columns(&self, table: &str, cond: &Record) -> QueryResult<()> {
        let fetcher = Fetcher::probe(&self.conn, table)?;
        for (column, _) in cond.iter() {
            if !fetcher.has_column(column) {
                return Err(QueryError::unknown_column(column));
            }
        }
        Ok(())
    }

    /// Create a table from a definition.
    ///
    /// With `exists_check` the statement is `CREATE TABLE IF NOT EXISTS`;
    /// without it, a bare `CREATE TABLE` is issued and any failure is masked
    /// as "table existed": the table is dropped and the create retried once.
    /// Returns the compiled schema, including the unique group to pass to
    /// [`Engine::insert`].
    pub fn create(
        &self,
        table: &str,
        def: &TableDef,
        exists_check: bool,
        unique_columns: &[&str],
    ) -> QueryResult<CompiledSchema> {
        let compiled = schema::compile(def, unique_columns);
        let columns = compiled.ddl();
        if exists_check {
            self.run(&sql::create_table(table, &columns, true))?;
        } else {
            let stmt = sql::create_table(table, &columns, false);
            if self.run(&stmt).is_err() {
                self.drop(table)?;
                self.run(&stmt)?;
            }
        }
        Ok(compiled)
    }

    /// Create several tables. No transactional guarantee: a later failure
    /// leaves earlier creates in place.
    pub fn create_many(&self, defs: &[(&str, &TableDef)], exists_check: bool) -> QueryResult<()> {
        for (table, def) in defs {
            self.create(table, def, exists_check, &[])?;
        }
        Ok(())
    }

    /// Drop a table, defensively creating it first so dropping a name with
    /// no schema cannot fail.
    pub fn drop(&self, table: &str) -> QueryResult<()> {
        self.create(table, &TableDef::default(), true, &[])?;
        self.run(&sql::drop_table(table))?;
        Ok(())
    }

    /// Insert a row, with optional emulated uniqueness.
    ///
    /// When a [`UniqueGroup`] is given, a check query over the group's member
    /// columns runs first; if a row already matches, it is returned and
    /// nothing is inserted (idempotent insert by natural key). The check and
    /// the write are separate statements, not atomic under concurrency.
    ///
    /// Values are embedded in the order `data` was given, which the caller
    /// must keep aligned with column order. A native integrity violation is
    /// logged and swallowed; the call still returns `Ok(None)`.
    pub fn insert(
        &self,
        table: &str,
        data: &Record,
        unique: Option<&UniqueGroup>,
    ) -> QueryResult<Option<Record>> {
        if let Some(group) = unique {
            if let Some(existing) = self.find_unique_match(table, data, group)? {
                return Ok(Some(existing));
            }
        }
        let stmt = sql::insert(table, data, self.mode);
        match self.run(&stmt) {
            Ok(_) => Ok(None),
            Err(QueryError::Driver(DriverError::Integrity(message))) => {
                tracing::error!(table, %message, "integrity violation on insert; row not stored");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn find_unique_match(
        &self,
        table: &str,
        data: &Record,
        group: &UniqueGroup,
    ) -> QueryResult<Option<Record>> {
        let fetcher = Fetcher::probe(&self.conn, table)?;
        let mut cond = Record::new();
        for member in &group.members {
            if !fetcher.has_column(member) {
                return Err(QueryError::unknown_column(member));
            }
            let value = data
                .get(member)
                .ok_or_else(|| QueryError::unknown_column(member))?;
            cond.insert(member.clone(), value.clone());
        }
        if cond.is_empty() {
            return Ok(None);
        }
        let stmt = sql::select("*", table, Some(&cond), None, 0, self.mode);
        Fetcher::new(self.run(&stmt)?).first(false)
    }

    /// Update matching rows, or every row with `update_all`.
    ///
    /// Requires a condition or the explicit `update_all` flag. Condition keys
    /// are validated against the table's real columns; `update_all` ignores
    /// the condition entirely.
    pub fn update(
        &self,
        table: &str,
        data: &Record,
        cond: Option<&Record>,
        update_all: bool,
    ) -> QueryResult<()> {
        if !update_all && cond.is_none() {
            return Err(QueryError::missing_condition(
                "update requires a condition or update_all",
            ));
        }
        if let Some(cond) = cond {
            self.validate_columns(table, cond)?;
        }
        let cond = if update_all { None } else { cond };
        self.run(&sql::update(table, data, cond, self.mode))?;
        Ok(())
    }

    /// Delete matching rows, or every row with `delete_all`.
    pub fn delete(
        &self,
        table: &str,
        cond: Option<&Record>,
        delete_all: bool,
    ) -> QueryResult<()> {
        if delete_all {
            self.run(&sql::delete(table, None, self.mode))?;
            return Ok(());
        }
        let cond = cond.ok_or_else(|| {
            QueryError::missing_condition("delete requires a condition or delete_all")
        })?;
        self.validate_columns(table, cond)?;
        self.run(&sql::delete(table, Some(cond), self.mode))?;
        Ok(())
    }

    /// Select rows, formatted per the options' output flags.
    ///
    /// Three mutually exclusive paths: a condition select (validated keys,
    /// full set or first row), a plain projected select, or (when a filter
    /// or regex is present) a full-table fetch filtered client-side.
    pub fn select(&self, table: &str, options: SelectOptions) -> QueryResult<Output> {
        if options.output.as_model {
            return Err(QueryError::configuration(
                "model output requested without a model; use select_models with a target type",
            ));
        }
        match self.run_select(table, &options)? {
            Fetched::All(rows) => format::format_rows(rows, &options.output),
            Fetched::First(row) => format::format_first(row, &options.output),
        }
    }

    /// Select rows and bind them to a typed model.
    pub fn select_models<M: Model>(
        &self,
        table: &str,
        options: SelectOptions,
    ) -> QueryResult<Vec<M>> {
        match self.run_select(table, &options)? {
            Fetched::All(rows) => model::bind(&rows),
            Fetched::First(row) => model::bind(row.as_slice()),
        }
    }

    fn run_select(&self, table: &str, options: &SelectOptions) -> QueryResult<Fetched> {
        let projection = options.select_column.as_deref().unwrap_or("*");
        let order_by = options.order_by.as_deref();

        if let Some(cond) = &options.condition {
            self.validate_columns(table, cond)?;
            let stmt = sql::select(projection, table, Some(cond), order_by, options.limit, self.mode);
            let mut fetcher = Fetcher::new(self.run(&stmt)?);
            return if options.first_only {
                Ok(Fetched::First(fetcher.first(false)?))
            } else {
                Ok(Fetched::All(fetcher.all()?))
            };
        }

        if options.filter.is_none() && options.regexp.is_none() {
            let stmt = sql::select(projection, table, None, order_by, options.limit, self.mode);
            let mut fetcher = Fetcher::new(self.run(&stmt)?);
            return Ok(Fetched::All(fetcher.all()?));
        }

        // Post-filtering needs full rows, so the projection is ignored here.
        let stmt = sql::select("*", table, None, order_by, options.limit, self.mode);
        let mut fetcher = Fetcher::new(self.run(&stmt)?);
        let rows = fetcher.all()?;
        let matches = match (&options.filter, &options.regexp) {
            (Some(predicate), _) => filter::apply_predicate(rows, predicate)?,
            (None, Some(regexp)) => filter::apply_regex(rows, regexp)?,
            (None, None) => rows,
        };
        Ok(Fetched::All(matches))
    }
}
