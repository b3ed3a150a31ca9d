//! Collapsing nested sub-query results to a scalar.

use crate::access::Value;
use crate::expression::{ExpressionError, ExpressionResult};

/// Unwrap a value that may arrive as rows of columns from a scalar sub-query.
///
/// A single row collapses to that row, and a single-column row collapses to
/// its value. No rows at all is `NULL`. Several rows, several columns, or a
/// row with no columns is an error. Plain scalars pass through untouched.
pub fn unroll_grouped(value: Value) -> ExpressionResult<Value> {
    let Value::Grouped(rows) = value else {
        return Ok(value);
    };

    if rows.is_empty() {
        return Ok(Value::Null);
    }
    if rows.len() > 1 {
        return Err(ExpressionError::SubqueryShape {
            reason: format!("got {} rows", rows.len()),
        });
    }

    match rows.into_iter().next() {
        Some(Value::Grouped(columns)) if columns.len() == 1 => {
            log::trace!("unrolled single-row single-column sub-query result");
            Ok(columns.into_iter().next().unwrap_or(Value::Null))
        }
        Some(Value::Grouped(columns)) => Err(ExpressionError::SubqueryShape {
            reason: format!("got {} columns", columns.len()),
        }),
        Some(scalar) => Ok(scalar),
        None => Ok(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_passes_through() {
        assert_eq!(unroll_grouped(Value::Integer(4)).unwrap(), Value::Integer(4));
        assert_eq!(unroll_grouped(Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_single_row_single_column() {
        let value = Value::Grouped(vec![Value::Grouped(vec![Value::text("x")])]);
        assert_eq!(unroll_grouped(value).unwrap(), Value::text("x"));

        let value = Value::Grouped(vec![Value::Integer(9)]);
        assert_eq!(unroll_grouped(value).unwrap(), Value::Integer(9));
    }

    #[test]
    fn test_no_rows_is_null() {
        assert_eq!(unroll_grouped(Value::Grouped(vec![])).unwrap(), Value::Null);
    }

    #[test]
    fn test_ambiguous_shapes_fail() {
        let two_rows = Value::Grouped(vec![Value::Integer(1), Value::Integer(2)]);
        assert!(matches!(
            unroll_grouped(two_rows),
            Err(ExpressionError::SubqueryShape { .. })
        ));

        let two_columns = Value::Grouped(vec![Value::Grouped(vec![
            Value::Integer(1),
            Value::Integer(2),
        ])]);
        assert!(matches!(
            unroll_grouped(two_columns),
            Err(ExpressionError::SubqueryShape { .. })
        ));

        let empty_row = Value::Grouped(vec![Value::Grouped(vec![])]);
        assert!(matches!(
            unroll_grouped(empty_row),
            Err(ExpressionError::SubqueryShape { .. })
        ));
    }
}
