use std::fmt::Display;
use std::sync::Arc;

use indexmap::IndexSet;
use log::debug;

use super::column::Column;
use super::value::DataValue;
use crate::error::{Result, TableError};

/// An immutable, ordered collection of [`Column`]s sharing one row count.
///
/// Column names are not required to be unique; looking a column up by name
/// returns the first one that matches. Every operation returns a new
/// [`Table`]. Columns that an operation does not touch are shared with the
/// input, storage included, so they stay unforced if they were unforced.
#[derive(Clone, Debug, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn empty() -> Table {
        Table {
            columns: Vec::new(),
        }
    }

    pub fn of_columns(columns: Vec<Column>) -> Result<Table> {
        //! Build a table out of columns, checking that they all have the
        //! same height.

        columns
            .into_iter()
            .try_fold(Table::empty(), |table, column| table.add(column))
    }

    pub fn count(&self) -> usize {
        self.columns.len()
    }

    pub fn rows_count(&self) -> usize {
        self.columns.first().map_or(0, Column::height)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn item(&self, index: usize) -> Result<&Column> {
        self.columns
            .get(index)
            .ok_or(TableError::ColumnNotFound {
                index,
                count: self.count(),
            })
    }

    pub fn item_by_name(&self, name: &str) -> Result<&Column> {
        self.try_item_by_name(name)
            .ok_or_else(|| TableError::NameNotFound(name.to_string()))
    }

    pub fn try_item(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn try_item_by_name(&self, name: &str) -> Option<&Column> {
        //! First column named `name`, if any.

        self.columns.iter().find(|column| column.name() == name)
    }

    pub fn add(&self, column: Column) -> Result<Table> {
        //! Append a column at the end.
        //!
        //! A non-empty table only accepts a column of its own row count.

        if !self.columns.is_empty() && column.height() != self.rows_count() {
            return Err(TableError::SchemaMismatch {
                expected: self.rows_count(),
                actual: column.height(),
            });
        }

        let mut columns = self.columns.clone();
        columns.push(column);
        Ok(Table { columns })
    }

    pub fn remove<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Table {
        //! Drop every column whose name is among `names`. Names that match
        //! nothing are ignored.

        let names: IndexSet<&str> = names.into_iter().collect();
        let columns = self
            .columns
            .iter()
            .filter(|column| !names.contains(column.name()))
            .cloned()
            .collect();

        Table { columns }
    }

    pub fn append(&self, other: &Table) -> Result<Table> {
        //! Place the columns of `other` after the columns of this table.
        //!
        //! Duplicate names across the two tables are kept as they are.

        if self.rows_count() != other.rows_count() {
            return Err(TableError::SchemaMismatch {
                expected: self.rows_count(),
                actual: other.rows_count(),
            });
        }

        let columns = self
            .columns
            .iter()
            .chain(other.columns.iter())
            .cloned()
            .collect();

        Ok(Table { columns })
    }

    pub fn select(&self, names: &[&str]) -> Result<Table> {
        //! Get specific columns from the table, in the given order.
        //!
        //! Returns a [`Table`] as a projection of the current one.

        let columns = self
            .resolve(names)?
            .into_iter()
            .cloned()
            .collect();

        Ok(Table { columns })
    }

    pub fn row(&self, index: usize) -> Result<Vec<DataValue>> {
        //! All the values of one row, left to right. Forces every column.

        if index >= self.rows_count() {
            return Err(TableError::RowOutOfRange {
                row: index,
                rows: self.rows_count(),
            });
        }

        self.columns
            .iter()
            .map(|column| column.value_at(index))
            .collect()
    }

    pub(crate) fn resolve(&self, names: &[&str]) -> Result<Vec<&Column>> {
        names.iter().map(|name| self.item_by_name(name)).collect()
    }

    pub(crate) fn replace_or_add(&self, column: Column) -> Result<Table> {
        //! Put `column` where the first column of the same name sits, or at
        //! the end if there is none.

        match self
            .columns
            .iter()
            .position(|existing| existing.name() == column.name())
        {
            Some(position) => {
                if column.height() != self.rows_count() {
                    return Err(TableError::SchemaMismatch {
                        expected: self.rows_count(),
                        actual: column.height(),
                    });
                }

                debug!("replacing column '{}' at {}", column.name(), position);
                let mut columns = self.columns.clone();
                columns[position] = column;
                Ok(Table { columns })
            }
            None => {
                debug!("appending column '{}'", column.name());
                self.add(column)
            }
        }
    }

    pub(crate) fn select_rows(&self, rows: Vec<usize>) -> Table {
        //! Keep only the rows at the given positions, in every column.

        let rows: Arc<[usize]> = Arc::from(rows);
        let columns = self
            .columns
            .iter()
            .map(|column| column.select(&rows))
            .collect();

        Table { columns }
    }
}

/// Shown in place of a value whose column cannot be read.
const UNREADABLE_CELL: &str = "#ERR";

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let schema: Vec<String> = self.columns.iter().map(|column| column.to_string()).collect();
        writeln!(f, "{}", schema.join(" | "))?;

        for index in 0..self.rows_count() {
            let row: Vec<String> = self
                .columns
                .iter()
                .map(|column| match column.value_at(index) {
                    Ok(value) => value.to_string(),
                    Err(_) => UNREADABLE_CELL.to_string(),
                })
                .collect();
            writeln!(f, "{}", row.join(" | "))?;
        }

        Ok(())
    }
}
