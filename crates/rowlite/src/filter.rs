//! Client-side post-fetch filtering.
//!
//! Both filters operate on an already-fetched record set; the engine always
//! pulls full rows before filtering, since a predicate may need a column the
//! projection would have dropped.
//!
//! A [`ColumnPredicate`] is an explicit `(column, closure)` pair: the closure
//! is invoked with the named column's value for each record. A
//! [`RegexFilter`] tests whether any of its patterns is found **anywhere**
//! inside the stringified value (a search, not a full match).

use crate::error::{QueryError, QueryResult};
use crate::record::{Record, ResultSet};
use crate::value::Value;
use regex::Regex;
use std::fmt;

/// A single-column boolean predicate.
pub struct ColumnPredicate {
    column: String,
    predicate: Box<dyn Fn(&Value) -> bool>,
}

impl ColumnPredicate {
    /// Pair a column name with a predicate over its value.
    pub fn new(column: impl Into<String>, predicate: impl Fn(&Value) -> bool + 'static) -> Self {
        Self {
            column: column.into(),
            predicate: Box::new(predicate),
        }
    }

    /// The target column name.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Decide whether a record is kept.
    ///
    /// An empty column name is a configuration error; a record without the
    /// column is an unknown-column error.
    pub fn keeps(&self, record: &Record) -> QueryResult<bool> {
        if self.column.is_empty() {
            return Err(QueryError::configuration(
                "no column name supplied to filter",
            ));
        }
        let value = record
            .get(&self.column)
            .ok_or_else(|| QueryError::unknown_column(&self.column))?;
        Ok((self.predicate)(value))
    }
}

impl fmt::Debug for ColumnPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnPredicate")
            .field("column", &self.column)
            .finish_non_exhaustive()
    }
}

/// A single-column pattern-search filter.
#[derive(Debug, Clone)]
pub struct RegexFilter {
    column: String,
    patterns: Vec<Regex>,
}

impl RegexFilter {
    /// Filter one column against a single pattern.
    pub fn new(column: impl Into<String>, pattern: &str) -> QueryResult<Self> {
        Self::any(column, &[pattern])
    }

    /// Filter one column against several patterns; the first match keeps the
    /// record.
    pub fn any(column: impl Into<String>, patterns: &[&str]) -> QueryResult<Self> {
        let column = column.into().to_lowercase();
        if column.is_empty() {
            return Err(QueryError::configuration(
                "no column name supplied to regex filter",
            ));
        }
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p).map_err(QueryError::from))
            .collect::<QueryResult<Vec<_>>>()?;
        Ok(Self { column, patterns })
    }

    /// The target column name (lowercased).
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Decide whether a record is kept.
    pub fn keeps(&self, record: &Record) -> QueryResult<bool> {
        let value = record
            .get(&self.column)
            .ok_or_else(|| QueryError::unknown_column(&self.column))?;
        let text = value.to_string();
        Ok(self.patterns.iter().any(|re| re.is_match(&text)))
    }
}

/// Keep the records the predicate accepts.
pub fn apply_predicate(rows: ResultSet, filter: &ColumnPredicate) -> QueryResult<ResultSet> {
    let mut matches = Vec::new();
    for record in rows {
        if filter.keeps(&record)? {
            matches.push(record);
        }
    }
    Ok(matches)
}

/// Keep the records with a pattern match.
pub fn apply_regex(rows: ResultSet, filter: &RegexFilter) -> QueryResult<ResultSet> {
    let mut matches = Vec::new();
    for record in rows {
        if filter.keeps(&record)? {
            matches.push(record);
        }
    }
    Ok(matches)
}
