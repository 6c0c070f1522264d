//! Typed function signatures checked against table columns.
//!
//! A function handed to a row-wise or whole-array operation declares its
//! parameter kinds through its Rust type. Before any row is evaluated the
//! declared kinds are compared, one by one, with the kinds of the named
//! columns. A wrong count of columns is an [`TableError::ArityMismatch`],
//! a wrong kind is a [`TableError::ColumnTypeMismatch`].

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::error::{Result, TableError};
use crate::storage::{Column, ColumnElement, ColumnValues, DataType, DataValue, LazyArray};

/// A type usable as a per-row function parameter.
///
/// The five element types bind only to a column of their own kind.
/// [`DataValue`] binds to a column of any kind.
pub trait Parameter: Sized {
    /// Whatever the parameter keeps of the column between rows.
    type Source;

    /// `None` accepts every kind.
    fn declared_kind() -> Option<DataType>;

    fn bind(values: &ColumnValues) -> Option<Self::Source>;

    fn fetch(source: &Self::Source, row: usize) -> Self;
}

macro_rules! element_parameter {
    ($type:ty) => {
        impl Parameter for $type {
            type Source = Arc<LazyArray<$type>>;

            fn declared_kind() -> Option<DataType> {
                Some(<$type as ColumnElement>::KIND)
            }

            fn bind(values: &ColumnValues) -> Option<Self::Source> {
                <$type as ColumnElement>::storage(values).cloned()
            }

            fn fetch(source: &Self::Source, row: usize) -> Self {
                source.force()[row].clone()
            }
        }
    };
}

element_parameter!(i64);
element_parameter!(f64);
element_parameter!(String);
element_parameter!(NaiveDateTime);
element_parameter!(bool);

impl Parameter for DataValue {
    type Source = ColumnValues;

    fn declared_kind() -> Option<DataType> {
        None
    }

    fn bind(values: &ColumnValues) -> Option<Self::Source> {
        Some(values.clone())
    }

    fn fetch(source: &Self::Source, row: usize) -> Self {
        match source {
            ColumnValues::Integer(array) => DataValue::Integer(array.force()[row]),
            ColumnValues::Real(array) => DataValue::Real(array.force()[row]),
            ColumnValues::Text(array) => DataValue::Text(array.force()[row].clone()),
            ColumnValues::DateTime(array) => DataValue::DateTime(array.force()[row]),
            ColumnValues::Boolean(array) => DataValue::Boolean(array.force()[row]),
        }
    }
}

/// A function evaluated once per row, one parameter per named column.
///
/// Implemented for every `Fn(A, B, ..) -> R` of up to six [`Parameter`]s.
pub trait RowFunction<Args, R> {
    type Bound;

    fn parameter_kinds() -> Vec<Option<DataType>>;

    /// Check the signature against `columns` and keep hold of their storage.
    fn bind(columns: &[&Column]) -> Result<Self::Bound>;

    fn call(&self, bound: &Self::Bound, row: usize) -> R;
}

/// Like [`RowFunction`], with the zero-based row index as the first
/// parameter: `Fn(usize, A, B, ..) -> R`.
pub trait IndexedRowFunction<Args, R> {
    type Bound;

    fn parameter_kinds() -> Vec<Option<DataType>>;

    fn bind(columns: &[&Column]) -> Result<Self::Bound>;

    fn call(&self, bound: &Self::Bound, row: usize) -> R;
}

/// A function evaluated once over whole column arrays:
/// `Fn(&[A], &[B], ..) -> R`.
pub trait ArrayFunction<Args, R> {
    fn parameter_kinds() -> Vec<DataType>;

    fn invoke(&self, columns: &[&Column]) -> Result<R>;
}

fn check_arity(expected: usize, supplied: usize) -> Result<()> {
    if expected == supplied {
        Ok(())
    } else {
        Err(TableError::ArityMismatch { expected, supplied })
    }
}

fn bind_parameter<P: Parameter>(column: &Column, position: usize) -> Result<P::Source> {
    P::bind(column.values()).ok_or_else(|| TableError::ColumnTypeMismatch {
        column: column.name().to_string(),
        position,
        expected: P::declared_kind().unwrap_or(column.kind()),
        actual: column.kind(),
    })
}

fn check_array_parameter<T: ColumnElement>(column: &Column, position: usize) -> Result<()> {
    if column.kind() == T::KIND {
        Ok(())
    } else {
        Err(TableError::ColumnTypeMismatch {
            column: column.name().to_string(),
            position,
            expected: T::KIND,
            actual: column.kind(),
        })
    }
}

macro_rules! row_functions {
    ($(($param:ident, $idx:tt)),*) => {
        impl<Func, Res, $($param,)*> RowFunction<($($param,)*), Res> for Func
        where
            Func: Fn($($param),*) -> Res,
            $($param: Parameter,)*
        {
            type Bound = ($(<$param as Parameter>::Source,)*);

            fn parameter_kinds() -> Vec<Option<DataType>> {
                vec![$(<$param as Parameter>::declared_kind()),*]
            }

            #[allow(unused_variables)]
            fn bind(columns: &[&Column]) -> Result<Self::Bound> {
                check_arity(Self::parameter_kinds().len(), columns.len())?;
                Ok(($(bind_parameter::<$param>(columns[$idx], $idx)?,)*))
            }

            #[allow(unused_variables)]
            fn call(&self, bound: &Self::Bound, row: usize) -> Res {
                (self)($(<$param as Parameter>::fetch(&bound.$idx, row)),*)
            }
        }

        impl<Func, Res, $($param,)*> IndexedRowFunction<($($param,)*), Res> for Func
        where
            Func: Fn(usize, $($param),*) -> Res,
            $($param: Parameter,)*
        {
            type Bound = ($(<$param as Parameter>::Source,)*);

            fn parameter_kinds() -> Vec<Option<DataType>> {
                vec![$(<$param as Parameter>::declared_kind()),*]
            }

            #[allow(unused_variables)]
            fn bind(columns: &[&Column]) -> Result<Self::Bound> {
                check_arity(Self::parameter_kinds().len(), columns.len())?;
                // parameter 0 is the row index
                Ok(($(bind_parameter::<$param>(columns[$idx], $idx + 1)?,)*))
            }

            #[allow(unused_variables)]
            fn call(&self, bound: &Self::Bound, row: usize) -> Res {
                (self)(row, $(<$param as Parameter>::fetch(&bound.$idx, row)),*)
            }
        }
    };
}

row_functions!();
row_functions!((A, 0));
row_functions!((A, 0), (B, 1));
row_functions!((A, 0), (B, 1), (C, 2));
row_functions!((A, 0), (B, 1), (C, 2), (D, 3));
row_functions!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4));
row_functions!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (G, 5));

macro_rules! array_functions {
    ($(($param:ident, $idx:tt)),+) => {
        impl<Func, Res, $($param,)+> ArrayFunction<($($param,)+), Res> for Func
        where
            Func: Fn($(&[$param]),+) -> Res,
            $($param: ColumnElement,)+
        {
            fn parameter_kinds() -> Vec<DataType> {
                vec![$(<$param as ColumnElement>::KIND),+]
            }

            fn invoke(&self, columns: &[&Column]) -> Result<Res> {
                check_arity(Self::parameter_kinds().len(), columns.len())?;
                $(check_array_parameter::<$param>(columns[$idx], $idx)?;)+

                Ok((self)($(columns[$idx].array::<$param>()?),+))
            }
        }
    };
}

array_functions!((A, 0));
array_functions!((A, 0), (B, 1));
array_functions!((A, 0), (B, 1), (C, 2));
array_functions!((A, 0), (B, 1), (C, 2), (D, 3));
array_functions!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4));
array_functions!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (G, 5));

/// A per-row result that can be turned into a column.
///
/// The five element types map straight onto their own kind. [`DataValue`]
/// results are classified after the fact and must all share one kind.
pub trait ColumnResult: Sized {
    fn collect_column(results: Vec<Self>) -> Result<ColumnValues>;
}

macro_rules! element_result {
    ($type:ty) => {
        impl ColumnResult for $type {
            fn collect_column(results: Vec<Self>) -> Result<ColumnValues> {
                Ok(ColumnValues::of_array(results))
            }
        }
    };
}

element_result!(i64);
element_result!(f64);
element_result!(String);
element_result!(NaiveDateTime);
element_result!(bool);

fn collect_values<T: ColumnElement>(results: Vec<DataValue>) -> ColumnValues {
    ColumnValues::of_array(
        results
            .into_iter()
            .filter_map(T::from_value)
            .collect::<Vec<T>>(),
    )
}

impl ColumnResult for DataValue {
    fn collect_column(results: Vec<Self>) -> Result<ColumnValues> {
        //! Classify the results into one kind.
        //!
        //! An empty result set has nothing to classify and becomes an
        //! empty text column.

        let kind = match results.first() {
            Some(first) => first.kind(),
            None => return Ok(ColumnValues::of_array(Vec::<String>::new())),
        };

        if let Some(other) = results.iter().find(|value| value.kind() != kind) {
            return Err(TableError::UnsupportedColumnType(format!(
                "results mix {} and {} values",
                kind,
                other.kind()
            )));
        }

        Ok(match kind {
            DataType::Integer => collect_values::<i64>(results),
            DataType::Real => collect_values::<f64>(results),
            DataType::Text => collect_values::<String>(results),
            DataType::DateTime => collect_values::<NaiveDateTime>(results),
            DataType::Boolean => collect_values::<bool>(results),
        })
    }
}
