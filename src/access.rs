//! Row-level data access.
//!
//! - **Value**: dynamically-typed scalar produced by evaluation, plus the
//!   coercion rules operators use to compare and combine values
//! - **Row**: the candidate data row an expression is evaluated against

pub mod value;

pub use value::{extract_numeric, loose_cmp, loose_eq, normalize_date_operands, Value};

use std::collections::HashMap;

/// A data row keyed by column name.
pub type Row = HashMap<String, Value>;
