use std::borrow::Cow;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::debug;

use super::settings::DelimitedSettings;
use crate::error::{Result, TableError};
use crate::storage::{DataValue, Table};

fn escape<'a>(field: &'a str, settings: &DelimitedSettings) -> Cow<'a, str> {
    //! Quote `field` if it holds the delimiter, the quote character or a
    //! line break. Quotes inside are doubled.

    let needs_quotes = field
        .chars()
        .any(|c| c == settings.delimiter || c == settings.quote || c == '\n' || c == '\r');

    if !needs_quotes {
        return Cow::Borrowed(field);
    }

    let quote = settings.quote.to_string();
    let doubled = quote.repeat(2);
    Cow::Owned(format!(
        "{}{}{}",
        quote,
        field.replace(&quote, &doubled),
        quote
    ))
}

fn render(value: &DataValue, settings: &DelimitedSettings) -> Result<String> {
    //! Locale-independent text for one value.
    //!
    //! Reals use the shortest representation that reads back to the same
    //! number and always carry a `.` or an exponent, so they are never
    //! mistaken for integers on the way back in.

    let rendered = match value {
        DataValue::Integer(value) => value.to_string(),
        DataValue::Real(value) => format!("{:?}", value),
        DataValue::Text(value) => value.clone(),
        DataValue::DateTime(value) => {
            let mut buffer = String::new();
            write!(buffer, "{}", value.format(&settings.date_time_format)).map_err(|_| {
                TableError::Settings(format!(
                    "cannot render {} with '{}'",
                    value, settings.date_time_format
                ))
            })?;
            buffer
        }
        DataValue::Boolean(value) => value.to_string(),
    };

    Ok(rendered)
}

fn write_line(destination: &mut impl Write, fields: &[String], settings: &DelimitedSettings) -> Result<()> {
    let line = fields.join(settings.delimiter.to_string().as_str());

    destination.write_all(line.as_bytes())?;
    destination.write_all(settings.newline.as_bytes())?;
    Ok(())
}

pub fn write(settings: &DelimitedSettings, table: &Table, mut destination: impl Write) -> Result<()> {
    //! Write the header line (if enabled) and then one line per row.
    //!
    //! A table without columns produces no output at all.

    settings.validate()?;

    if table.count() == 0 {
        return Ok(());
    }

    for column in table.columns() {
        column.force()?;
    }

    if settings.has_header {
        let names: Vec<String> = table
            .columns()
            .iter()
            .map(|column| escape(column.name(), settings).into_owned())
            .collect();

        write_line(&mut destination, &names, settings)?;
    }

    for row in 0..table.rows_count() {
        let fields = table
            .columns()
            .iter()
            .map(|column| -> Result<String> {
                let value = column.values().value_at(row)?;
                let rendered = render(&value, settings)?;
                Ok(escape(&rendered, settings).into_owned())
            })
            .collect::<Result<Vec<String>>>()?;

        write_line(&mut destination, &fields, settings)?;
    }

    destination.flush()?;
    debug!(
        "wrote {} row(s) of {} column(s)",
        table.rows_count(),
        table.count()
    );
    Ok(())
}

pub fn write_string(settings: &DelimitedSettings, table: &Table) -> Result<String> {
    let mut buffer: Vec<u8> = Vec::new();
    write(settings, table, &mut buffer)?;

    String::from_utf8(buffer).map_err(|e| TableError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

pub fn write_path(settings: &DelimitedSettings, table: &Table, path: impl AsRef<Path>) -> Result<()> {
    //! Create (or truncate) `path` and write the table to it. The file is
    //! closed on every exit path.

    let file = File::create(path.as_ref())?;
    debug!("writing {}", path.as_ref().display());

    write(settings, table, BufWriter::new(file))
}
