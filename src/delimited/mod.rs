//! Delimited text files (CSV and friends).
//!
//! Reading parses a header line into column names, infers each column's
//! kind from a sample of the rows (unless the settings force one), and
//! parses every row into column storage. Writing emits the header and one
//! line per row. With the same [`DelimitedSettings`] on both sides a
//! written table reads back with the same names, kinds and values.
//!
//! # Issues
//! - Inference cannot tell a text column whose every value looks like a
//! number (or a date, or a boolean) from a real number column. Such columns
//! need a `column_types` override to read back as text.

mod inference;
mod reader;
mod records;
mod settings;
mod writer;

pub use reader::{infer_column_types, read, read_path, read_str};
pub use settings::{
    ColumnSelector, ColumnTypeOverride, DEFAULT_DATE_TIME_FORMAT, DEFAULT_SAMPLE_SIZE,
    DelimitedSettings,
};
pub use writer::{write, write_path, write_string};
