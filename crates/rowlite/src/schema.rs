//! Schema compiler: declarative table definitions to DDL column clauses.
//!
//! A [`TableDef`] is an ordered list of [`FieldDef`]s. Field roles are
//! declared with the tagged [`FieldKind`] enum at the definition site:
//! primary key, plain, or a unique-match marker carrying the member columns
//! of an application-level composite natural key. Marker fields never become
//! columns; they are dropped from the DDL and registered as the table's
//! [`UniqueGroup`] instead.
//!
//! Compilation is cheap and stateless: the engine recompiles the definition
//! whenever it needs column-name validation rather than persisting schema
//! objects.

use regex::Regex;
use std::sync::OnceLock;

/// Declared field type.
///
/// Integer and floating-point declarations both compile to the SQL `int`
/// type; everything else is stored as `text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Integer-kind declaration
    Int,
    /// Floating-point-kind declaration
    Float,
    /// Everything else
    Text,
}

/// Semantic column type after inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    /// Stored as SQL `int`
    Integer,
    /// Stored as SQL `text`
    Text,
}

impl SemanticType {
    fn sql_type(self) -> &'static str {
        match self {
            SemanticType::Integer => "int",
            SemanticType::Text => "text",
        }
    }
}

/// Role of a declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Ordinary column
    Plain,
    /// Column declared as the table's primary key
    PrimaryKey,
    /// Synthetic marker: not a column, registers the named member columns as
    /// an application-level unique group
    UniqueMatch(Vec<String>),
}

/// One declared field: name, type, role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: FieldType,
    pub kind: FieldKind,
}

impl FieldDef {
    /// Declare an ordinary field.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            kind: FieldKind::Plain,
        }
    }

    /// Declare a primary-key field.
    pub fn primary(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            kind: FieldKind::PrimaryKey,
        }
    }

    /// Declare a unique-match marker over the given member columns.
    pub fn unique_match(name: impl Into<String>, members: &[&str]) -> Self {
        Self {
            name: name.into(),
            ty: FieldType::Text,
            kind: FieldKind::UniqueMatch(members.iter().map(|m| m.to_string()).collect()),
        }
    }

    /// Parse a plain textual declaration of the form `"name: type"`.
    ///
    /// `int` and `float` map to [`FieldType::Int`]/[`FieldType::Float`];
    /// any other type text maps to [`FieldType::Text`]. A declaration that
    /// does not match the form falls back to one text column named by the
    /// sanitized full text rather than failing.
    pub fn parse(decl: &str) -> Self {
        static DECL: OnceLock<Regex> = OnceLock::new();
        let re = DECL.get_or_init(|| Regex::new(r"(\w+)\s*:\s*(.+)").expect("valid pattern"));
        match re.captures(decl) {
            Some(caps) => {
                let name = caps[1].to_string();
                let ty = match caps[2].trim() {
                    "int" => FieldType::Int,
                    "float" => FieldType::Float,
                    _ => FieldType::Text,
                };
                FieldDef::new(name, ty)
            }
            None => FieldDef::new(sanitize(decl), FieldType::Text),
        }
    }
}

/// An ordered table definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    fields: Vec<FieldDef>,
}

impl TableDef {
    /// Start an empty definition.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append an ordinary field.
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldDef::new(name, ty));
        self
    }

    /// Append a primary-key field.
    pub fn primary(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldDef::primary(name, ty));
        self
    }

    /// Append a unique-match marker over the given member columns.
    pub fn unique_match(mut self, name: impl Into<String>, members: &[&str]) -> Self {
        self.fields.push(FieldDef::unique_match(name, members));
        self
    }

    /// Append an already-built [`FieldDef`].
    pub fn push(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Declared fields in order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }
}

/// The schema used by `drop`'s defensive create: a single `id int` column.
impl Default for TableDef {
    fn default() -> Self {
        TableDef::new().field("id", FieldType::Int)
    }
}

/// One compiled column description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Sanitized, lowercased column name
    pub name: String,
    /// Inferred storage type
    pub semantic: SemanticType,
    /// Carries `primary key` in the DDL
    pub is_primary: bool,
    /// Carries a bare `unique` in the DDL (overrides `primary key`)
    pub unique: bool,
}

impl FieldSpec {
    /// The DDL fragment for this column: `"<name> <int|text>[ primary key| unique]"`.
    pub fn ddl(&self) -> String {
        let suffix = if self.unique {
            " unique"
        } else if self.is_primary {
            " primary key"
        } else {
            ""
        };
        format!("{} {}{}", self.name, self.semantic.sql_type(), suffix)
    }
}

/// A set of columns enforced as a composite natural key at the application
/// level, not via a native constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueGroup {
    /// Name of the marker field the group was declared through
    pub name: String,
    /// Member column names, in declaration order
    pub members: Vec<String>,
}

/// A compiled table schema: column specs in declaration order plus the
/// optional unique group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSchema {
    pub columns: Vec<FieldSpec>,
    pub unique_group: Option<UniqueGroup>,
}

impl CompiledSchema {
    /// The comma-joined DDL column clause.
    pub fn ddl(&self) -> String {
        self.columns
            .iter()
            .map(FieldSpec::ddl)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Strip all non-alphanumeric characters and lowercase the rest.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Compile a table definition into column specs and the optional unique
/// group.
///
/// A field whose sanitized name appears (case-insensitively) in
/// `unique_columns` gets a bare `unique` suffix; this overrides a
/// primary-key declaration. Unique-match markers are excluded from the
/// column list; when several are declared, the last one wins.
pub fn compile(def: &TableDef, unique_columns: &[&str]) -> CompiledSchema {
    let mut columns = Vec::new();
    let mut unique_group = None;

    for field in def.fields() {
        if let FieldKind::UniqueMatch(members) = &field.kind {
            unique_group = Some(UniqueGroup {
                name: sanitize(&field.name),
                members: members.clone(),
            });
            continue;
        }

        let name = sanitize(&field.name);
        let unique = unique_columns
            .iter()
            .any(|c| c.trim().eq_ignore_ascii_case(&name));
        columns.push(FieldSpec {
            semantic: match field.ty {
                FieldType::Int | FieldType::Float => SemanticType::Integer,
                FieldType::Text => SemanticType::Text,
            },
            is_primary: field.kind == FieldKind::PrimaryKey,
            unique,
            name,
        });
    }

    CompiledSchema {
        columns,
        unique_group,
    }
}
