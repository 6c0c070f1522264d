//! The row function adapter.
//!
//! This module takes externally supplied functions and runs them against
//! the columns of a [`crate::storage::Table`]. Two shapes of function are
//! supported:
//!
//! - Row-wise functions are called once per row with one scalar per named
//! column (`map`, `mapi`, `filter`, `filteri`, `map_to_column`,
//! `mapi_to_column`).
//! - Whole-array functions are called once with the complete arrays of the
//! named columns (`transform`, `append_transform`).
//!
//! A function's parameter list is its contract. The adapter resolves the
//! names, then compares arity and kinds with the columns before a single
//! row is evaluated, so a mismatch never leaves a half-built result behind.

mod operations;
mod signature;

pub use signature::{
    ArrayFunction, ColumnResult, IndexedRowFunction, Parameter, RowFunction,
};
