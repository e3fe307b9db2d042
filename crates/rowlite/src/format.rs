//! Result formatting: raw records, JSON, or a tabular frame.
//!
//! Output selection is priority-ordered: model > json > frame > raw, first
//! truthy flag wins. The model path is typed and therefore lives on
//! [`Engine::select_models`](crate::Engine::select_models); requesting
//! `as_model` on the untyped path is a configuration error.

use crate::error::{QueryError, QueryResult};
use crate::record::{Record, ResultSet};
use crate::value::Value;
use std::fmt;

/// Output selection flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Bind to typed instances (only valid with a model type)
    pub as_model: bool,
    /// Serialize the record set to a JSON string
    pub as_json: bool,
    /// Convert the record set to a column-major [`Frame`]
    pub as_frame: bool,
}

/// A formatted query result.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// The raw record sequence (default)
    Rows(ResultSet),
    /// A single record, from a first-row select
    Row(Option<Record>),
    /// JSON text
    Json(String),
    /// Column-major tabular frame
    Frame(Frame),
}

impl Output {
    /// The record sequence, if this is [`Output::Rows`].
    pub fn rows(&self) -> Option<&ResultSet> {
        match self {
            Output::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    /// The single record, if this is [`Output::Row`].
    pub fn row(&self) -> Option<&Record> {
        match self {
            Output::Row(row) => row.as_ref(),
            _ => None,
        }
    }
}

/// A column-major frame: column order follows the first record's key order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    columns: Vec<String>,
    data: Vec<Vec<Value>>,
}

impl Frame {
    /// Build a frame from a record sequence. An empty set yields an empty
    /// frame.
    pub fn from_rows(rows: &[Record]) -> Self {
        let Some(first) = rows.first() else {
            return Frame::default();
        };
        let columns: Vec<String> = first.keys().map(str::to_string).collect();
        let data = columns
            .iter()
            .map(|column| {
                rows.iter()
                    .map(|record| record.get(column).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Frame { columns, data }
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// One column's values, by name.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.data[i].as_slice())
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    /// True if the frame holds no data.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Renders as a bordered table.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut table = comfy_table::Table::new();
        table.set_header(self.columns.clone());
        for i in 0..self.height() {
            table.add_row(self.data.iter().map(|col| col[i].to_string()));
        }
        write!(f, "{table}")
    }
}

/// Format a fetched record set according to the output flags.
pub fn format_rows(rows: ResultSet, config: &OutputConfig) -> QueryResult<Output> {
    if config.as_model {
        return Err(model_without_model());
    }
    if config.as_json {
        return Ok(Output::Json(serde_json::to_string(&rows)?));
    }
    if config.as_frame {
        return Ok(Output::Frame(Frame::from_rows(&rows)));
    }
    Ok(Output::Rows(rows))
}

/// Format a first-row fetch according to the output flags.
pub fn format_first(row: Option<Record>, config: &OutputConfig) -> QueryResult<Output> {
    if config.as_model {
        return Err(model_without_model());
    }
    if config.as_json {
        return Ok(Output::Json(serde_json::to_string(&row)?));
    }
    if config.as_frame {
        let rows: ResultSet = row.into_iter().collect();
        return Ok(Output::Frame(Frame::from_rows(&rows)));
    }
    Ok(Output::Row(row))
}

fn model_without_model() -> QueryError {
    QueryError::configuration(
        "model output requested without a model; use select_models with a target type",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    fn people() -> ResultSet {
        vec![
            record! { "id" => 1, "name" => "a" },
            record! { "id" => 999, "name" => "b" },
        ]
    }

    #[test]
    fn default_config_returns_raw_rows() {
        let out = format_rows(people(), &OutputConfig::default()).unwrap();
        assert_eq!(out, Output::Rows(people()));
    }

    #[test]
    fn json_wins_over_frame() {
        let config = OutputConfig {
            as_json: true,
            as_frame: true,
            ..Default::default()
        };
        let out = format_rows(people(), &config).unwrap();
        assert_eq!(
            out,
            Output::Json(r#"[{"id":1,"name":"a"},{"id":999,"name":"b"}]"#.to_string())
        );
    }

    #[test]
    fn as_model_without_a_model_is_a_configuration_error() {
        let config = OutputConfig {
            as_model: true,
            ..Default::default()
        };
        let err = format_rows(people(), &config).unwrap_err();
        assert!(matches!(err, QueryError::Configuration(_)));
    }

    #[test]
    fn frame_is_column_major() {
        let frame = Frame::from_rows(&people());
        assert_eq!(frame.columns(), ["id", "name"]);
        assert_eq!(frame.height(), 2);
        assert_eq!(
            frame.column("id").unwrap(),
            [Value::Int(1), Value::Int(999)]
        );
        assert_eq!(frame.column("missing"), None);
    }

    #[test]
    fn empty_set_yields_an_empty_frame() {
        let frame = Frame::from_rows(&[]);
        assert!(frame.is_empty());
        assert_eq!(frame.height(), 0);
    }

    #[test]
    fn frame_renders_as_a_table() {
        let frame = Frame::from_rows(&people());
        let rendered = frame.to_string();
        assert!(rendered.contains("id"));
        assert!(rendered.contains("999"));
    }

    #[test]
    fn first_row_formats_as_single_record() {
        let out = format_first(Some(record! { "id" => 1 }), &OutputConfig::default()).unwrap();
        assert_eq!(out, Output::Row(Some(record! { "id" => 1 })));
        let out = format_first(None, &OutputConfig::default()).unwrap();
        assert_eq!(out, Output::Row(None));
    }

    #[test]
    fn first_row_as_json() {
        let config = OutputConfig {
            as_json: true,
            ..Default::default()
        };
        let out = format_first(Some(record! { "id" => 1 }), &config).unwrap();
        assert_eq!(out, Output::Json(r#"{"id":1}"#.to_string()));
        let out = format_first(None, &config).unwrap();
        assert_eq!(out, Output::Json("null".to_string()));
    }
}
