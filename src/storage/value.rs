use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// The five scalar kinds a column can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Integer,
    Real,
    Text,
    DateTime,
    Boolean,
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let datatype = match self {
            DataType::Integer => "INT",
            DataType::Real => "REAL",
            DataType::Text => "TEXT",
            DataType::DateTime => "DATETIME",
            DataType::Boolean => "BOOL",
        };
        write!(f, "{}", datatype)
    }
}

/// A single scalar taken out of a column.
///
/// Each variant carries exactly one payload. The `as_*` accessors fail with
/// [`TableError::TypeMismatch`] when asked for a kind the value is not.
#[derive(Clone, Debug, PartialEq)]
pub enum DataValue {
    Integer(i64),
    Real(f64),
    Text(String),
    DateTime(NaiveDateTime),
    Boolean(bool),
}

impl DataValue {
    pub fn kind(&self) -> DataType {
        match self {
            DataValue::Integer(_) => DataType::Integer,
            DataValue::Real(_) => DataType::Real,
            DataValue::Text(_) => DataType::Text,
            DataValue::DateTime(_) => DataType::DateTime,
            DataValue::Boolean(_) => DataType::Boolean,
        }
    }

    fn mismatch(&self, expected: DataType) -> TableError {
        TableError::TypeMismatch {
            expected,
            actual: self.kind(),
        }
    }

    pub fn as_integer(&self) -> Result<i64> {
        match self {
            DataValue::Integer(value) => Ok(*value),
            other => Err(other.mismatch(DataType::Integer)),
        }
    }

    pub fn as_real(&self) -> Result<f64> {
        match self {
            DataValue::Real(value) => Ok(*value),
            other => Err(other.mismatch(DataType::Real)),
        }
    }

    pub fn as_text(&self) -> Result<&str> {
        match self {
            DataValue::Text(value) => Ok(value.as_str()),
            other => Err(other.mismatch(DataType::Text)),
        }
    }

    pub fn as_date_time(&self) -> Result<NaiveDateTime> {
        match self {
            DataValue::DateTime(value) => Ok(*value),
            other => Err(other.mismatch(DataType::DateTime)),
        }
    }

    pub fn as_boolean(&self) -> Result<bool> {
        match self {
            DataValue::Boolean(value) => Ok(*value),
            other => Err(other.mismatch(DataType::Boolean)),
        }
    }
}

impl Display for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataValue::Integer(value) => write!(f, "{}", value),
            DataValue::Real(value) => write!(f, "{:?}", value),
            DataValue::Text(value) => write!(f, "{}", value),
            DataValue::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S%.f")),
            DataValue::Boolean(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Integer(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Real(value)
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::Text(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Text(value.to_string())
    }
}

impl From<NaiveDateTime> for DataValue {
    fn from(value: NaiveDateTime) -> Self {
        DataValue::DateTime(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Boolean(value)
    }
}
