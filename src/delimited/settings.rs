use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};
use crate::storage::DataType;

pub const DEFAULT_SAMPLE_SIZE: usize = 1000;
pub const DEFAULT_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const ALLOWED_NEWLINES: [&str; 3] = ["\n", "\r\n", "\r"];

/// Picks a column either by position or by name.
///
/// In JSON a number selects by position and a string by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSelector {
    Index(usize),
    Name(String),
}

impl ColumnSelector {
    pub fn matches(&self, index: usize, name: &str) -> bool {
        match self {
            ColumnSelector::Index(position) => *position == index,
            ColumnSelector::Name(column) => column == name,
        }
    }
}

impl From<usize> for ColumnSelector {
    fn from(index: usize) -> Self {
        ColumnSelector::Index(index)
    }
}

impl From<&str> for ColumnSelector {
    fn from(name: &str) -> Self {
        ColumnSelector::Name(name.to_string())
    }
}

impl From<String> for ColumnSelector {
    fn from(name: String) -> Self {
        ColumnSelector::Name(name)
    }
}

/// Forces a column to a kind instead of inferring it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnTypeOverride {
    pub column: ColumnSelector,
    pub kind: DataType,
}

/// How delimited text is read and written.
///
/// The same settings must be used on both sides for a written table to read
/// back unchanged. Every field has a default, so a JSON document only has
/// to name what it changes:
///
/// ```json
/// { "delimiter": ";", "column_types": [{ "column": "id", "kind": "integer" }] }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelimitedSettings {
    pub delimiter: char,
    pub quote: char,
    pub newline: String,
    pub has_header: bool,
    /// Number of data rows looked at when inferring column kinds.
    pub sample_size: usize,
    /// `strftime` pattern for DateTime fields.
    pub date_time_format: String,
    pub column_types: Vec<ColumnTypeOverride>,
}

impl Default for DelimitedSettings {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            newline: "\n".to_string(),
            has_header: true,
            sample_size: DEFAULT_SAMPLE_SIZE,
            date_time_format: DEFAULT_DATE_TIME_FORMAT.to_string(),
            column_types: Vec::new(),
        }
    }
}

impl DelimitedSettings {
    pub fn from_json(json: &str) -> Result<DelimitedSettings> {
        //! Load settings from a JSON document and validate them.

        let settings: DelimitedSettings =
            serde_json::from_str(json).map_err(|e| TableError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_newline(mut self, newline: &str) -> Self {
        self.newline = newline.to_string();
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn with_date_time_format(mut self, format: &str) -> Self {
        self.date_time_format = format.to_string();
        self
    }

    pub fn with_column_type(mut self, column: impl Into<ColumnSelector>, kind: DataType) -> Self {
        self.column_types.push(ColumnTypeOverride {
            column: column.into(),
            kind,
        });
        self
    }

    pub fn column_type(&self, index: usize, name: &str) -> Option<DataType> {
        //! The kind forced on the column at `index` named `name`, if any.
        //! The first matching override wins.

        self.column_types
            .iter()
            .find(|column_type| column_type.column.matches(index, name))
            .map(|column_type| column_type.kind)
    }

    pub fn validate(&self) -> Result<()> {
        if self.delimiter == self.quote {
            return Err(TableError::Settings(format!(
                "delimiter and quote are both '{}'",
                self.delimiter
            )));
        }

        for (role, c) in [("delimiter", self.delimiter), ("quote", self.quote)] {
            if c == '\n' || c == '\r' {
                return Err(TableError::Settings(format!(
                    "{} cannot be a line break",
                    role
                )));
            }
        }

        if !ALLOWED_NEWLINES.contains(&self.newline.as_str()) {
            return Err(TableError::Settings(format!(
                "newline must be one of \\n, \\r\\n or \\r, got {:?}",
                self.newline
            )));
        }

        if StrftimeItems::new(&self.date_time_format).any(|item| matches!(item, Item::Error)) {
            return Err(TableError::Settings(format!(
                "invalid date/time format '{}'",
                self.date_time_format
            )));
        }

        Ok(())
    }
}
