//! Row-constructor comparison: `(a, b) = (c, d)`, `(a, b) < (c, d)`.

use crate::access::{loose_cmp, loose_eq, Value};
use crate::expression::binary::comparison_holds;
use crate::expression::eval::ExpressionEvaluator;
use crate::expression::{BinaryOperator, Expression, ExpressionError, ExpressionResult};

/// Reject a row comparison before any element is evaluated: only the six
/// comparison operators apply to rows, and both rows need the same arity.
pub fn validate_row_comparison(
    operator: BinaryOperator,
    left_len: usize,
    right_len: usize,
) -> ExpressionResult<()> {
    if !operator.is_comparison() {
        return Err(ExpressionError::OperandColumnCount { expected: 1 });
    }
    if left_len != right_len {
        return Err(ExpressionError::RowArityMismatch {
            left: left_len,
            right: right_len,
        });
    }
    Ok(())
}

/// Lexicographic comparison of two evaluated row constructors.
///
/// Leading elements that are loosely equal are skipped; the first element
/// that differs (or the last one, if none does) decides the outcome using
/// the plain value ordering. Empty rows compare false.
///
/// Expects input already accepted by [`validate_row_comparison`].
pub fn compare_tuples(operator: BinaryOperator, left: &[Value], right: &[Value]) -> bool {
    let last = left.len().saturating_sub(1);
    for (i, (l, r)) in left.iter().zip(right).enumerate() {
        if i < last && loose_eq(l, r) {
            continue;
        }
        let ordering = loose_cmp(l, r);
        log::trace!(
            "row comparison decided at element {}: {} {} {}",
            i,
            l,
            operator.as_str(),
            r
        );
        return comparison_holds(operator, ordering).unwrap_or(false);
    }
    false
}

impl ExpressionEvaluator<'_> {
    /// Evaluate both row constructors and compare them element-wise.
    pub(crate) fn compare_rows(
        &mut self,
        operator: BinaryOperator,
        left: &[Expression],
        right: &[Expression],
    ) -> ExpressionResult<bool> {
        validate_row_comparison(operator, left.len(), right.len())?;
        let left_values = self.evaluate_row(left)?;
        let right_values = self.evaluate_row(right)?;
        Ok(compare_tuples(operator, &left_values, &right_values))
    }
}
