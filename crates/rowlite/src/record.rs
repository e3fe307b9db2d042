//! Ordered row records.
//!
//! A [`Record`] is one row expressed as a column-name-to-value mapping. It
//! preserves insertion order because declaration order is load-bearing
//! throughout the crate: DDL column order, INSERT value order, and JSON
//! output order all follow it.

use crate::error::{QueryError, QueryResult};
use crate::model::FromValue;
use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// An ordered sequence of records, as returned by a fetch.
pub type ResultSet = Vec<Record>;

/// One row as an insertion-ordered column-name-to-value mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value. Replaces an existing entry in place, otherwise
    /// appends.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| *name == column) {
            entry.1 = value;
        } else {
            self.entries.push((column, value));
        }
    }

    /// Look up a column value by name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Column names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over `(column, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode one column into a typed value.
    ///
    /// Returns [`QueryError::Decode`] if the column is missing or the value
    /// does not convert.
    pub fn decode<T: FromValue>(&self, column: &str) -> QueryResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| QueryError::decode(column, "column missing from record"))?;
        T::from_value(column, value)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Build a [`Record`] from `column => value` pairs.
///
/// ```ignore
/// use rowlite::record;
///
/// let row = record! { "id" => 1, "name" => "ada" };
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($($column:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $(record.insert($column, $value);)+
        record
    }};
}
