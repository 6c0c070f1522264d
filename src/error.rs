//! Every failure the engine can report.
//!
//! Lookups, schema checks and function signature checks fail before any
//! row is touched. Codec failures abort the whole read, so a caller never
//! ends up holding a truncated table.

use crate::storage::DataType;

pub type Result<T> = std::result::Result<T, TableError>;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: DataType, actual: DataType },

    #[error("column not found: index {index} in a table of {count} column(s)")]
    ColumnNotFound { index: usize, count: usize },

    #[error("column not found: no column named '{0}'")]
    NameNotFound(String),

    #[error("schema mismatch: expected {expected} row(s), found {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("arity mismatch: function takes {expected} column(s), {supplied} supplied")]
    ArityMismatch { expected: usize, supplied: usize },

    #[error(
        "column type mismatch: parameter {position} expects {expected}, column '{column}' is {actual}"
    )]
    ColumnTypeMismatch {
        column: String,
        position: usize,
        expected: DataType,
        actual: DataType,
    },

    #[error("unsupported column type: {0}")]
    UnsupportedColumnType(String),

    #[error("data integrity: column '{column}' declares {expected} row(s), storage holds {actual}")]
    DataIntegrity {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("row {row} is out of range for {rows} row(s)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("line {line}: expected {expected} field(s), found {actual}")]
    RowShapeMismatch {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("line {line}: cannot parse '{raw}' as {kind} in column '{column}'")]
    FieldParseError {
        line: usize,
        column: String,
        raw: String,
        kind: DataType,
    },

    #[error("invalid settings: {0}")]
    Settings(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
