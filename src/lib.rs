//! An immutable, columnar in-memory table engine.
//!
//! - [`storage`] holds the data model: values, lazily forced column
//! storage, columns and tables.
//! - [`functions`] adapts user functions to table columns.
//! - [`delimited`] reads and writes tables as delimited text.

pub mod delimited;
mod error;
pub mod functions;
pub mod storage;

pub use error::{Result, TableError};
