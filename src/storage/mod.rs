//! The data model of the engine.
//! - Value (a single scalar of one of five kinds)
//! - ColumnValues (a typed, compute-once array of those scalars)
//! - Column (a name, a storage, a declared height; never mutated)
//! - Table (an ordered list of columns sharing one height)
//!

//  All modules of this lib
mod column;
mod column_values;
mod table;
mod value;

//  External API
pub use column::Column;
pub use column_values::{ColumnElement, ColumnValues, LazyArray};
pub use table::Table;
pub use value::{DataType, DataValue};
