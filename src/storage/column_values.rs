//! Typed, lazily forced column storage.
//!
//! A [`LazyArray`] is a single-assignment cell: it starts out holding either
//! a finished array or a pending producer. The first caller to force it runs
//! the producer, every later (or concurrent) caller gets the same array back.
//! [`ColumnValues`] is the five-way union of those cells, one arm per
//! [`DataType`].

use std::fmt::Debug;
use std::sync::{Arc, Mutex, OnceLock};

use chrono::NaiveDateTime;
use log::{trace, warn};

use super::value::{DataType, DataValue};
use crate::error::{Result, TableError};

type Producer<T> = Box<dyn FnOnce() -> Vec<T> + Send>;

/// A compute-once array.
///
/// The producer is taken out of its slot the moment it runs, so whatever it
/// captured is released as soon as the array exists.
///
/// # Issues
/// - A producer that panics leaves the cell empty with no producer to retry.
/// The next force yields an empty array, which the owning column then
/// reports as a data integrity failure.
pub struct LazyArray<T> {
    cell: OnceLock<Vec<T>>,
    producer: Mutex<Option<Producer<T>>>,
}

impl<T: Send + Sync + 'static> LazyArray<T> {
    pub fn of_array(data: Vec<T>) -> LazyArray<T> {
        let cell = OnceLock::new();
        let _ = cell.set(data);

        LazyArray {
            cell,
            producer: Mutex::new(None),
        }
    }

    pub fn of_producer<F>(producer: F) -> LazyArray<T>
    where
        F: FnOnce() -> Vec<T> + Send + 'static,
    {
        LazyArray {
            cell: OnceLock::new(),
            producer: Mutex::new(Some(Box::new(producer))),
        }
    }

    pub fn force(&self) -> &[T] {
        //! Run the producer if nobody has yet, and return the array.
        //!
        //! Concurrent first callers block on the cell until the single
        //! running producer finishes, then all observe the same array.

        self.cell.get_or_init(|| {
            let producer = self
                .producer
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .take();

            match producer {
                Some(producer) => {
                    trace!("forcing lazy array");
                    producer()
                }
                None => {
                    warn!("lazy array has no producer left; yielding an empty array");
                    Vec::new()
                }
            }
        })
    }

    pub fn is_forced(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Debug for LazyArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.cell.get() {
            Some(data) => write!(f, "LazyArray(forced, {} item(s))", data.len()),
            None => write!(f, "LazyArray(pending)"),
        }
    }
}

/// The storage of one column: a memoized array of a single scalar kind.
///
/// Cloning shares the underlying cell, it never copies data.
#[derive(Clone, Debug)]
pub enum ColumnValues {
    Integer(Arc<LazyArray<i64>>),
    Real(Arc<LazyArray<f64>>),
    Text(Arc<LazyArray<String>>),
    DateTime(Arc<LazyArray<NaiveDateTime>>),
    Boolean(Arc<LazyArray<bool>>),
}

/// Apply the same expression to whichever arm is present.
macro_rules! visit {
    ($values:expr, $array:ident => $body:expr) => {
        match $values {
            ColumnValues::Integer($array) => $body,
            ColumnValues::Real($array) => $body,
            ColumnValues::Text($array) => $body,
            ColumnValues::DateTime($array) => $body,
            ColumnValues::Boolean($array) => $body,
        }
    };
}

/// Same as `visit!` but wraps the result back into the arm it came from.
macro_rules! rewrap {
    ($values:expr, $array:ident => $body:expr) => {
        match $values {
            ColumnValues::Integer($array) => ColumnValues::Integer($body),
            ColumnValues::Real($array) => ColumnValues::Real($body),
            ColumnValues::Text($array) => ColumnValues::Text($body),
            ColumnValues::DateTime($array) => ColumnValues::DateTime($body),
            ColumnValues::Boolean($array) => ColumnValues::Boolean($body),
        }
    };
}

impl ColumnValues {
    pub fn of_array<T: ColumnElement>(data: Vec<T>) -> ColumnValues {
        T::wrap(Arc::new(LazyArray::of_array(data)))
    }

    pub fn of_lazy_array<T, F>(producer: F) -> ColumnValues
    where
        T: ColumnElement,
        F: FnOnce() -> Vec<T> + Send + 'static,
    {
        T::wrap(Arc::new(LazyArray::of_producer(producer)))
    }

    pub fn kind(&self) -> DataType {
        match self {
            ColumnValues::Integer(_) => DataType::Integer,
            ColumnValues::Real(_) => DataType::Real,
            ColumnValues::Text(_) => DataType::Text,
            ColumnValues::DateTime(_) => DataType::DateTime,
            ColumnValues::Boolean(_) => DataType::Boolean,
        }
    }

    pub fn is_forced(&self) -> bool {
        visit!(self, array => array.is_forced())
    }

    pub fn len(&self) -> usize {
        //! Number of items in the storage. Forces it.

        visit!(self, array => array.force().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn array<T: ColumnElement>(&self) -> Result<&[T]> {
        //! Typed access to the whole array.
        //!
        //! Asking for the wrong kind fails with [`TableError::TypeMismatch`]
        //! and leaves the storage untouched.

        T::storage(self)
            .map(|array| array.force())
            .ok_or(TableError::TypeMismatch {
                expected: T::KIND,
                actual: self.kind(),
            })
    }

    pub fn as_integers(&self) -> Result<&[i64]> {
        self.array::<i64>()
    }

    pub fn as_reals(&self) -> Result<&[f64]> {
        self.array::<f64>()
    }

    pub fn as_texts(&self) -> Result<&[String]> {
        self.array::<String>()
    }

    pub fn as_date_times(&self) -> Result<&[NaiveDateTime]> {
        self.array::<NaiveDateTime>()
    }

    pub fn as_booleans(&self) -> Result<&[bool]> {
        self.array::<bool>()
    }

    pub fn value_at(&self, row: usize) -> Result<DataValue> {
        //! Positional access to a single value, forcing the storage.

        visit!(self, array => {
            let data = array.force();
            data.get(row)
                .map(|value| value.clone().into_value())
                .ok_or(TableError::RowOutOfRange {
                    row,
                    rows: data.len(),
                })
        })
    }

    pub(crate) fn select(&self, rows: &Arc<[usize]>, observed: &Arc<OnceLock<usize>>) -> ColumnValues {
        //! A new lazy storage holding only the given row positions, in the
        //! given order. The source is not forced until the result is.
        //!
        //! Forcing the result records the source's length in `observed`, so
        //! the owner can compare it with the height it expected.

        rewrap!(self, array => select_rows(array, rows, observed))
    }
}

fn select_rows<T>(
    source: &Arc<LazyArray<T>>,
    rows: &Arc<[usize]>,
    observed: &Arc<OnceLock<usize>>,
) -> Arc<LazyArray<T>>
where
    T: Clone + Send + Sync + 'static,
{
    let source = Arc::clone(source);
    let rows = Arc::clone(rows);
    let observed = Arc::clone(observed);

    Arc::new(LazyArray::of_producer(move || {
        let data = source.force();
        let _ = observed.set(data.len());
        rows.iter()
            .filter_map(|&row| data.get(row).cloned())
            .collect()
    }))
}

/// Rust types that can be stored in a column.
///
/// Implemented for exactly the five scalar kinds: `i64`, `f64`, `String`,
/// `NaiveDateTime` and `bool`.
pub trait ColumnElement: Clone + Send + Sync + 'static {
    const KIND: DataType;

    fn storage(values: &ColumnValues) -> Option<&Arc<LazyArray<Self>>>;

    fn wrap(array: Arc<LazyArray<Self>>) -> ColumnValues;

    fn into_value(self) -> DataValue;

    fn from_value(value: DataValue) -> Option<Self>;
}

macro_rules! column_element {
    ($type:ty, $variant:ident) => {
        impl ColumnElement for $type {
            const KIND: DataType = DataType::$variant;

            fn storage(values: &ColumnValues) -> Option<&Arc<LazyArray<Self>>> {
                match values {
                    ColumnValues::$variant(array) => Some(array),
                    _ => None,
                }
            }

            fn wrap(array: Arc<LazyArray<Self>>) -> ColumnValues {
                ColumnValues::$variant(array)
            }

            fn into_value(self) -> DataValue {
                DataValue::$variant(self)
            }

            fn from_value(value: DataValue) -> Option<Self> {
                match value {
                    DataValue::$variant(value) => Some(value),
                    _ => None,
                }
            }
        }

        impl From<Vec<$type>> for ColumnValues {
            fn from(data: Vec<$type>) -> Self {
                ColumnValues::of_array(data)
            }
        }
    };
}

column_element!(i64, Integer);
column_element!(f64, Real);
column_element!(String, Text);
column_element!(NaiveDateTime, DateTime);
column_element!(bool, Boolean);
