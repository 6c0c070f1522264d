use std::fmt::Display;
use std::sync::{Arc, OnceLock};

use super::column_values::{ColumnElement, ColumnValues};
use super::value::{DataType, DataValue};
use crate::error::{Result, TableError};

/// A named, typed, fixed-height column.
///
/// A [`Column`] never changes once built. Cloning it is cheap: the name is
/// copied but the storage is shared with the original.
///
/// The `height` is declared up front so lazy columns can take part in
/// schema checks without being forced. Storage that turns out to hold a
/// different number of items is reported as [`TableError::DataIntegrity`]
/// the first time it is read through the column. A column selected out of
/// another one also reports the source's mismatch.
#[derive(Clone, Debug)]
pub struct Column {
    name: String,
    values: ColumnValues,
    height: usize,
    sources: Vec<SourceHeight>,
}

/// Height of a column this one was selected from, and the length its
/// storage turned out to have once forced.
#[derive(Clone, Debug)]
struct SourceHeight {
    column: String,
    expected: usize,
    observed: Arc<OnceLock<usize>>,
}

impl Column {
    pub fn of_array<T: ColumnElement>(name: impl Into<String>, data: Vec<T>) -> Column {
        //! Build a column from data already in memory.

        let height = data.len();
        Column {
            name: name.into(),
            values: ColumnValues::of_array(data),
            height,
            sources: Vec::new(),
        }
    }

    pub fn of_lazy_array<T, F>(name: impl Into<String>, producer: F, count: usize) -> Column
    where
        T: ColumnElement,
        F: FnOnce() -> Vec<T> + Send + 'static,
    {
        //! Build a column whose data is produced on first access.
        //!
        //! `count` must match the length `producer` returns.

        Column {
            name: name.into(),
            values: ColumnValues::of_lazy_array(producer),
            height: count,
            sources: Vec::new(),
        }
    }

    pub fn of_column_values(name: impl Into<String>, values: ColumnValues, count: usize) -> Column {
        Column {
            name: name.into(),
            values,
            height: count,
            sources: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn kind(&self) -> DataType {
        self.values.kind()
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn is_forced(&self) -> bool {
        self.values.is_forced()
    }

    fn check_height(&self, actual: usize) -> Result<()> {
        if actual == self.height {
            Ok(())
        } else {
            Err(TableError::DataIntegrity {
                column: self.name.clone(),
                expected: self.height,
                actual,
            })
        }
    }

    fn check_sources(&self) -> Result<()> {
        //! Only sources whose storage has been forced are checked.

        for source in self.sources.iter() {
            if let Some(&actual) = source.observed.get() {
                if actual != source.expected {
                    return Err(TableError::DataIntegrity {
                        column: source.column.clone(),
                        expected: source.expected,
                        actual,
                    });
                }
            }
        }

        Ok(())
    }

    pub fn force(&self) -> Result<()> {
        //! Materialize the storage and verify it agrees with the declared
        //! height, and that every column it was selected from did too.

        let actual = self.values.len();
        self.check_sources()?;
        self.check_height(actual)
    }

    pub fn array<T: ColumnElement>(&self) -> Result<&[T]> {
        //! The whole column as a typed slice.
        //!
        //! Fails with [`TableError::TypeMismatch`] for the wrong kind, and
        //! with [`TableError::DataIntegrity`] if the forced storage
        //! disagrees with the height.

        let data = self.values.array::<T>()?;
        self.check_sources()?;
        self.check_height(data.len())?;
        Ok(data)
    }

    pub fn value_at(&self, row: usize) -> Result<DataValue> {
        if row >= self.height {
            return Err(TableError::RowOutOfRange {
                row,
                rows: self.height,
            });
        }
        self.force()?;
        self.values.value_at(row)
    }

    pub fn rename(&self, name: impl Into<String>) -> Column {
        //! Same storage under a different name.

        Column {
            name: name.into(),
            values: self.values.clone(),
            height: self.height,
            sources: self.sources.clone(),
        }
    }

    pub(crate) fn select(&self, rows: &Arc<[usize]>) -> Column {
        //! The given rows of this column, still unforced.

        let observed = Arc::new(OnceLock::new());
        let mut sources = self.sources.clone();
        sources.push(SourceHeight {
            column: self.name.clone(),
            expected: self.height,
            observed: Arc::clone(&observed),
        });

        Column {
            name: self.name.clone(),
            values: self.values.select(rows, &observed),
            height: rows.len(),
            sources,
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.kind())
    }
}
