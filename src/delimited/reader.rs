use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDateTime;
use log::debug;

use super::inference::{infer_kind, parse_boolean, parse_date_time, parse_integer, parse_real};
use super::records::{Record, parse_records};
use super::settings::DelimitedSettings;
use crate::error::{Result, TableError};
use crate::storage::{Column, DataType, Table};

/// Typed buffer that one column's fields are parsed into.
enum ColumnBuilder {
    Integer(Vec<i64>),
    Real(Vec<f64>),
    Text(Vec<String>),
    DateTime(Vec<NaiveDateTime>),
    Boolean(Vec<bool>),
}

impl ColumnBuilder {
    fn new(kind: DataType, capacity: usize) -> ColumnBuilder {
        match kind {
            DataType::Integer => ColumnBuilder::Integer(Vec::with_capacity(capacity)),
            DataType::Real => ColumnBuilder::Real(Vec::with_capacity(capacity)),
            DataType::Text => ColumnBuilder::Text(Vec::with_capacity(capacity)),
            DataType::DateTime => ColumnBuilder::DateTime(Vec::with_capacity(capacity)),
            DataType::Boolean => ColumnBuilder::Boolean(Vec::with_capacity(capacity)),
        }
    }

    fn kind(&self) -> DataType {
        match self {
            ColumnBuilder::Integer(_) => DataType::Integer,
            ColumnBuilder::Real(_) => DataType::Real,
            ColumnBuilder::Text(_) => DataType::Text,
            ColumnBuilder::DateTime(_) => DataType::DateTime,
            ColumnBuilder::Boolean(_) => DataType::Boolean,
        }
    }

    fn push(&mut self, raw: &str, date_time_format: &str) -> bool {
        //! Parse `raw` and append it. Returns `false` if it does not parse.

        let parsed = match self {
            ColumnBuilder::Integer(data) => parse_integer(raw).map(|value| data.push(value)),
            ColumnBuilder::Real(data) => parse_real(raw).map(|value| data.push(value)),
            ColumnBuilder::Text(data) => {
                data.push(raw.to_string());
                Some(())
            }
            ColumnBuilder::DateTime(data) => {
                parse_date_time(raw, date_time_format).map(|value| data.push(value))
            }
            ColumnBuilder::Boolean(data) => parse_boolean(raw).map(|value| data.push(value)),
        };

        parsed.is_some()
    }

    fn into_column(self, name: &str, count: usize) -> Column {
        match self {
            ColumnBuilder::Integer(data) => Column::of_lazy_array(name, move || data, count),
            ColumnBuilder::Real(data) => Column::of_lazy_array(name, move || data, count),
            ColumnBuilder::Text(data) => Column::of_lazy_array(name, move || data, count),
            ColumnBuilder::DateTime(data) => Column::of_lazy_array(name, move || data, count),
            ColumnBuilder::Boolean(data) => Column::of_lazy_array(name, move || data, count),
        }
    }
}

/// Column names and the data records that follow them.
fn split_header(settings: &DelimitedSettings, records: Vec<Record>) -> (Vec<String>, Vec<Record>) {
    let mut records = records.into_iter();

    if settings.has_header {
        match records.next() {
            Some(header) => (header.fields, records.collect()),
            None => (Vec::new(), Vec::new()),
        }
    } else {
        let body: Vec<Record> = records.collect();
        let width = body.first().map_or(0, |record| record.fields.len());
        let names = (0..width).map(|index| format!("col{}", index)).collect();
        (names, body)
    }
}

fn column_kinds(settings: &DelimitedSettings, names: &[String], body: &[Record]) -> Vec<DataType> {
    //! Take each column's kind from the overrides, or infer it from the
    //! first `sample_size` well-shaped records.

    let sample: Vec<&Record> = body
        .iter()
        .take(settings.sample_size)
        .filter(|record| record.fields.len() == names.len())
        .collect();

    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            settings.column_type(index, name).unwrap_or_else(|| {
                infer_kind(
                    sample.iter().map(|record| record.fields[index].as_str()),
                    &settings.date_time_format,
                )
            })
        })
        .collect()
}

pub fn infer_column_types(settings: &DelimitedSettings, text: &str) -> Result<Vec<(String, DataType)>> {
    //! Column names paired with the kinds [`read_str`] would give them,
    //! without parsing the whole body.

    settings.validate()?;

    let records = parse_records(text, settings.delimiter, settings.quote);
    let (names, body) = split_header(settings, records);
    let kinds = column_kinds(settings, &names, &body);

    Ok(names.into_iter().zip(kinds).collect())
}

pub fn read_str(settings: &DelimitedSettings, text: &str) -> Result<Table> {
    //! Parse delimited text into a [`Table`].
    //!
    //! - The header (or `col0`, `col1`, ... without one) names the columns.
    //! - Each column's kind comes from the overrides or from inference.
    //! - Every record is then checked for shape and parsed, in order. The
    //! first bad record aborts the read.
    //!
    //! The columns are built lazily but forced before returning, so the
    //! table does not depend on `text` afterwards.

    settings.validate()?;

    let records = parse_records(text, settings.delimiter, settings.quote);
    let (names, body) = split_header(settings, records);

    if names.is_empty() {
        return Ok(Table::empty());
    }

    let kinds = column_kinds(settings, &names, &body);
    debug!(
        "columns: {}",
        names
            .iter()
            .zip(kinds.iter())
            .map(|(name, kind)| format!("{} ({})", name, kind))
            .collect::<Vec<String>>()
            .join(" | ")
    );

    let mut builders: Vec<ColumnBuilder> = kinds
        .iter()
        .map(|&kind| ColumnBuilder::new(kind, body.len()))
        .collect();

    for record in body.iter() {
        if record.fields.len() != names.len() {
            return Err(TableError::RowShapeMismatch {
                line: record.line,
                expected: names.len(),
                actual: record.fields.len(),
            });
        }

        for ((builder, raw), name) in builders.iter_mut().zip(record.fields.iter()).zip(names.iter()) {
            if !builder.push(raw, &settings.date_time_format) {
                return Err(TableError::FieldParseError {
                    line: record.line,
                    column: name.clone(),
                    raw: raw.clone(),
                    kind: builder.kind(),
                });
            }
        }
    }

    let count = body.len();
    let columns = builders
        .into_iter()
        .zip(names.iter())
        .map(|(builder, name)| builder.into_column(name, count))
        .collect::<Vec<Column>>();

    for column in columns.iter() {
        column.force()?;
    }

    debug!("read {} row(s) into {} column(s)", count, columns.len());
    Table::of_columns(columns)
}

pub fn read(settings: &DelimitedSettings, mut source: impl Read) -> Result<Table> {
    //! Read a table from any byte source. The source is only used for the
    //! duration of the call.

    settings.validate()?;

    let mut text = String::new();
    source.read_to_string(&mut text)?;

    read_str(settings, &text)
}

pub fn read_path(settings: &DelimitedSettings, path: impl AsRef<Path>) -> Result<Table> {
    //! Open `path`, read a table from it and close it again, whether the
    //! read succeeds or not.

    let file = File::open(path.as_ref())?;
    debug!("reading {}", path.as_ref().display());

    read(settings, BufReader::new(file))
}
