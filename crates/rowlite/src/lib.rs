//! rowlite is a schema-definition-first query layer over a generic SQL
//! connection.
//!
//! Tables are declared as ordered field definitions, compiled to DDL, and
//! queried through a small facade: create, insert, update, select, delete.
//! The layer adds what thin drivers leave out: emulated composite unique
//! keys with idempotent inserts, condition-key validation against real table
//! columns, client-side predicate and regex filtering, and pluggable result
//! shapes (records, JSON, a column-major frame, or typed models).
//!
//! The driver seam is the [`Connection`] trait; any synchronous driver that
//! can execute a statement and hand back columns plus rows can sit under the
//! engine.
//!
//! ```ignore
//! use rowlite::{record, Engine, FieldType, SelectOptions, TableDef};
//!
//! let engine = Engine::new(conn);
//! let schema = engine.create(
//!     "users",
//!     &TableDef::new()
//!         .primary("id", FieldType::Int)
//!         .field("name", FieldType::Text)
//!         .unique_match("check", &["id", "name"]),
//!     true,
//!     &[],
//! )?;
//!
//! let row = record! { "id" => 1, "name" => "ada" };
//! engine.insert("users", &row, schema.unique_group.as_ref())?;
//!
//! let out = engine.select(
//!     "users",
//!     SelectOptions::new().condition(record! { "id" => 1 }).first(),
//! )?;
//! ```
//!
//! By default statements embed values as literals, byte for byte what the
//! tests assert; [`SqlMode::Parameterized`] switches the engine to `?`
//! placeholders with bound parameters for drivers that support it.

pub mod connection;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod format;
pub mod model;
pub mod record;
pub mod schema;
pub mod sql;
pub mod value;

#[cfg(test)]
pub(crate) mod testing;

pub use connection::{Connection, Cursor};
pub use engine::{Engine, SelectOptions};
pub use error::{DriverError, DriverResult, QueryError, QueryResult};
pub use fetch::Fetcher;
pub use filter::{ColumnPredicate, RegexFilter};
pub use format::{Frame, Output, OutputConfig};
pub use model::{DIGIT_KEY_PREFIX, FromValue, Model};
pub use record::{Record, ResultSet};
pub use schema::{
    CompiledSchema, FieldDef, FieldKind, FieldSpec, FieldType, SemanticType, TableDef, UniqueGroup,
};
pub use sql::{SqlMode, Statement};
pub use value::Value;
