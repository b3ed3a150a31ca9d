//! Column schemas consumed by type inference.

pub mod column_type;

pub use column_type::ColumnType;

use std::collections::HashMap;

/// Column name to schema type, for the columns an expression may reference.
pub type ColumnSchemas = HashMap<String, ColumnType>;
