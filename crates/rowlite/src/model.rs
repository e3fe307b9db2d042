//! Typed model binding.
//!
//! [`Model`] is the Record → struct seam: a bound type declares its field
//! names and how to build itself from a record. The [`model!`](crate::model!)
//! macro generates both for plain structs.
//!
//! Binding validates shape first: for every record, the sorted key set must
//! equal the sorted field-name set of the target type, and a mismatch is
//! reported with the offending record's position. Record keys beginning with
//! a digit are rewritten with the `attr` prefix before comparison and
//! binding, since they cannot be Rust field names.

use crate::error::{QueryError, QueryResult};
use crate::record::Record;
use crate::value::Value;

/// Prefix applied to record keys that begin with a digit.
pub const DIGIT_KEY_PREFIX: &str = "attr";

/// A typed target for record binding.
pub trait Model: Sized {
    /// Declared field names, in declaration order.
    fn field_names() -> &'static [&'static str];

    /// Build an instance from a record whose keys match [`Model::field_names`].
    fn from_record(record: &Record) -> QueryResult<Self>;
}

/// Conversion from a scalar [`Value`] into a field type.
pub trait FromValue: Sized {
    /// Convert, reporting failures as a decode error on `column`.
    fn from_value(column: &str, value: &Value) -> QueryResult<Self>;
}

impl FromValue for i64 {
    fn from_value(column: &str, value: &Value) -> QueryResult<Self> {
        match value {
            Value::Int(v) => Ok(*v),
            other => Err(QueryError::decode(
                column,
                format!("expected integer, got {other:?}"),
            )),
        }
    }
}

impl FromValue for f64 {
    fn from_value(column: &str, value: &Value) -> QueryResult<Self> {
        match value {
            Value::Float(v) => Ok(*v),
            Value::Int(v) => Ok(*v as f64),
            other => Err(QueryError::decode(
                column,
                format!("expected number, got {other:?}"),
            )),
        }
    }
}

impl FromValue for String {
    fn from_value(column: &str, value: &Value) -> QueryResult<Self> {
        match value {
            Value::Text(v) => Ok(v.clone()),
            Value::Int(v) => Ok(v.to_string()),
            Value::Float(v) => Ok(v.to_string()),
            Value::Null => Err(QueryError::decode(column, "expected text, got NULL")),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(column: &str, value: &Value) -> QueryResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(column, other).map(Some),
        }
    }
}

/// Rewrite digit-leading keys with [`DIGIT_KEY_PREFIX`].
fn rewrite_digit_keys(record: &Record) -> Record {
    record
        .iter()
        .map(|(key, value)| {
            let key = if key.starts_with(|c: char| c.is_ascii_digit()) {
                format!("{DIGIT_KEY_PREFIX}{key}")
            } else {
                key.to_string()
            };
            (key, value.clone())
        })
        .collect()
}

/// Bind a record sequence to typed instances.
///
/// Every record's sorted (rewritten) key set must equal the model's sorted
/// field-name set; the first mismatch aborts with a
/// [`QueryError::SchemaMismatch`] naming the record position.
pub fn bind<M: Model>(rows: &[Record]) -> QueryResult<Vec<M>> {
    let mut expected: Vec<&str> = M::field_names().to_vec();
    expected.sort_unstable();

    rows.iter()
        .enumerate()
        .map(|(index, record)| {
            let rewritten = rewrite_digit_keys(record);
            let mut keys: Vec<&str> = rewritten.keys().collect();
            keys.sort_unstable();
            if keys != expected {
                return Err(QueryError::SchemaMismatch {
                    index,
                    message: format!(
                        "record keys [{}] do not match model fields [{}]",
                        keys.join(", "),
                        expected.join(", ")
                    ),
                });
            }
            M::from_record(&rewritten)
        })
        .collect()
}

/// Define a struct that binds from records.
///
/// ```ignore
/// use rowlite::model;
///
/// model! {
///     #[derive(Debug, PartialEq)]
///     pub struct Person {
///         pub id: i64,
///         pub name: String,
///         pub age: i64,
///     }
/// }
/// ```
#[macro_export]
macro_rules! model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($fvis:vis $field:ident : $ty:ty),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $($fvis $field: $ty),+
        }

        impl $crate::Model for $name {
            fn field_names() -> &'static [&'static str] {
                &[$(stringify!($field)),+]
            }

            fn from_record(record: &$crate::Record) -> $crate::QueryResult<Self> {
                Ok(Self {
                    $($field: record.decode::<$ty>(stringify!($field))?),+
                })
            }
        }
    };
}
