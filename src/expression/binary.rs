//! Binary operator evaluation.
//!
//! Dispatch runs in a fixed order: row-constructor comparison, missing right
//! operand, `COLLATE`, interval arithmetic, and only then the general case,
//! which evaluates both operands unconditionally (no short-circuit for
//! `AND`/`OR`), unrolls sub-query shapes, and decides whether comparisons run
//! on strings or on floats.

use crate::access::{extract_numeric, loose_cmp, loose_eq, normalize_date_operands, Row, Value};
use crate::catalog::ColumnSchemas;
use crate::expression::eval::ExpressionEvaluator;
use crate::expression::function::is_binary_marker;
use crate::expression::pattern::{compile_like, compile_rlike};
use crate::expression::scope::Scope;
use crate::expression::unroll::unroll_grouped;
use crate::expression::{
    BinaryOperation, BinaryOperator, Expression, ExpressionError, ExpressionResult,
};
use crate::session::Session;
use std::cmp::Ordering;

/// Whether `ordering` satisfies comparison operator `op`. An unordered pair
/// (`None`) only satisfies `<>`. Returns `None` for non-comparison operators.
pub(crate) fn comparison_holds(op: BinaryOperator, ordering: Option<Ordering>) -> Option<bool> {
    let holds = match op {
        BinaryOperator::Eq => ordering == Some(Ordering::Equal),
        BinaryOperator::NotEq => ordering != Some(Ordering::Equal),
        BinaryOperator::Gt => ordering == Some(Ordering::Greater),
        BinaryOperator::GtEq => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        BinaryOperator::Lt => ordering == Some(Ordering::Less),
        BinaryOperator::LtEq => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        _ => return None,
    };
    Some(holds)
}

/// `<>`, `>`, `>=`, `<`, `<=` on two scalars: string casts compared loosely
/// in string mode, float casts otherwise.
fn compare_scalars(op: BinaryOperator, left: &Value, right: &Value, as_string: bool) -> bool {
    let ordering = if as_string {
        loose_cmp(
            &Value::Text(left.cast_string()),
            &Value::Text(right.cast_string()),
        )
    } else {
        left.cast_float().partial_cmp(&right.cast_float())
    };
    comparison_holds(op, ordering).unwrap_or(false)
}

/// Integer arithmetic when both operands are integers and the result fits,
/// float arithmetic otherwise.
fn int_or_float(
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Value {
    if let (Value::Integer(a), Value::Integer(b)) = (left, right) {
        if let Some(result) = int_op(*a, *b) {
            return Value::Integer(result);
        }
    }
    Value::Float(float_op(left.cast_float(), right.cast_float()))
}

fn shift(op: BinaryOperator, value: i64, count: i64) -> ExpressionResult<Value> {
    if count < 0 {
        return Err(ExpressionError::EvaluationError {
            message: format!("{} by negative count {}", op.as_str(), count),
        });
    }
    let shifted = match (op, count >= 64) {
        (BinaryOperator::ShiftLeft, true) => 0,
        (BinaryOperator::ShiftLeft, false) => value.wrapping_shl(count as u32),
        (_, true) => {
            if value < 0 {
                -1
            } else {
                0
            }
        }
        (_, false) => value >> count,
    };
    Ok(Value::Integer(shifted))
}

/// Arithmetic and bitwise operators on values reduced by `extract_numeric`.
pub(crate) fn evaluate_arithmetic(
    op: BinaryOperator,
    left: &Value,
    right: &Value,
) -> ExpressionResult<Value> {
    let left = extract_numeric(left);
    let right = extract_numeric(right);

    let nonzero_divisor = || {
        if right.cast_float() == 0.0 {
            Err(ExpressionError::DivisionByZero)
        } else {
            Ok(right.cast_float())
        }
    };

    match op {
        BinaryOperator::Multiply => Ok(int_or_float(&left, &right, i64::checked_mul, |a, b| a * b)),
        BinaryOperator::Plus => Ok(int_or_float(&left, &right, i64::checked_add, |a, b| a + b)),
        BinaryOperator::Minus => Ok(int_or_float(&left, &right, i64::checked_sub, |a, b| a - b)),
        BinaryOperator::Modulo => {
            let divisor = nonzero_divisor()?;
            Ok(Value::Float(left.cast_float() % divisor))
        }
        BinaryOperator::Divide => {
            let divisor = nonzero_divisor()?;
            Ok(Value::Float(left.cast_float() / divisor))
        }
        BinaryOperator::IntegerDivide => {
            let divisor = nonzero_divisor()?;
            if let (Value::Integer(a), Value::Integer(b)) = (&left, &right) {
                if let Some(quotient) = a.checked_div(*b) {
                    return Ok(Value::Integer(quotient));
                }
            }
            Ok(Value::Integer(
                Value::Float(left.cast_float() / divisor).cast_int(),
            ))
        }
        BinaryOperator::ShiftLeft | BinaryOperator::ShiftRight => {
            shift(op, left.cast_int(), right.cast_int())
        }
        BinaryOperator::BitwiseOr => Ok(Value::Integer(left.cast_int() | right.cast_int())),
        BinaryOperator::BitwiseAnd => Ok(Value::Integer(left.cast_int() & right.cast_int())),
        other => Err(ExpressionError::UnimplementedOperator {
            operator: other.as_str().to_string(),
        }),
    }
}

impl ExpressionEvaluator<'_> {
    /// Evaluate a binary operation
    pub fn evaluate_binary_op(&mut self, op: &BinaryOperation) -> ExpressionResult<Value> {
        let left = &*op.left;

        if let Expression::Row(left_items) = left {
            let Some(Expression::Row(right_items)) = op.right.as_deref() else {
                return Err(ExpressionError::RowOperandExpected {
                    operator: op.operator.as_str().to_string(),
                });
            };
            let outcome = self.compare_rows(op.operator, left_items, right_items)?;
            return Ok(op.apply_negation(outcome));
        }

        let Some(right) = op.right.as_deref() else {
            return Err(ExpressionError::malformed(format!(
                "{} operator with no right operand",
                op.operator.as_str()
            )));
        };

        if op.operator == BinaryOperator::Collate {
            return self.evaluate(left);
        }

        if let Expression::Interval { .. } = right {
            match op.operator {
                BinaryOperator::Plus | BinaryOperator::Minus => {
                    let subtract = op.operator == BinaryOperator::Minus;
                    log::debug!(
                        "rewriting {} INTERVAL as {}",
                        op.operator.as_str(),
                        if subtract { "DATE_SUB" } else { "DATE_ADD" }
                    );
                    return self.evaluate_date_arithmetic(subtract, left, right);
                }
                _ => {}
            }
        }

        let left_value = unroll_grouped(self.evaluate(left)?)?;
        let right_value = unroll_grouped(self.evaluate(right)?)?;
        let left_type = self.column_schema(left)?;
        let right_type = self.column_schema(right)?;

        let mut as_string = left.is_string_literal() || right.is_string_literal();
        let mut l = left_value.clone();
        let mut r = right_value.clone();
        if left_type.is_string() && right_type.is_string() {
            normalize_date_operands(&mut l, &mut r);
            as_string = true;
        }

        match op.operator {
            BinaryOperator::And => Ok(op.apply_negation(l.is_truthy() && r.is_truthy())),
            BinaryOperator::Or => Ok(op.apply_negation(l.is_truthy() || r.is_truthy())),

            BinaryOperator::Eq => Ok(op.apply_negation(loose_eq(&l, &r))),
            BinaryOperator::NotEq
            | BinaryOperator::Gt
            | BinaryOperator::GtEq
            | BinaryOperator::Lt
            | BinaryOperator::LtEq => {
                Ok(op.apply_negation(compare_scalars(op.operator, &l, &r, as_string)))
            }

            BinaryOperator::Multiply
            | BinaryOperator::Modulo
            | BinaryOperator::Minus
            | BinaryOperator::Plus
            | BinaryOperator::ShiftLeft
            | BinaryOperator::ShiftRight
            | BinaryOperator::Divide
            | BinaryOperator::IntegerDivide
            | BinaryOperator::BitwiseOr
            | BinaryOperator::BitwiseAnd => evaluate_arithmetic(op.operator, &l, &r),

            BinaryOperator::Like => {
                if !matches!(right, Expression::Literal(_)) {
                    return Err(ExpressionError::unsupported(
                        "LIKE",
                        "pattern should be a constant string",
                    ));
                }
                let regex = compile_like(
                    &right_value.cast_string(),
                    self.session.config.regex_size_limit,
                )?;
                Ok(op.apply_negation(regex.is_match(&left_value.cast_string())))
            }

            BinaryOperator::Is => {
                if !matches!(right, Expression::Literal(_)) || !right_value.is_null() {
                    return Err(ExpressionError::unsupported(
                        "IS",
                        format!("right operand must be NULL, got {}", right_value),
                    ));
                }
                Ok(op.apply_negation(left_value.is_null()))
            }

            BinaryOperator::RLike => {
                let regex = compile_rlike(
                    &right_value.cast_string(),
                    !is_binary_marker(right),
                    self.session.config.regex_size_limit,
                )?;
                Ok(op.apply_negation(regex.is_match(&left_value.cast_string())))
            }

            BinaryOperator::Assign => {
                let Expression::Variable(name) = left else {
                    return Err(ExpressionError::unsupported(
                        ":=",
                        "left operand must be a variable",
                    ));
                };
                log::debug!("assigning @{} := {}", name, right_value);
                self.scope.set(name.clone(), right_value.clone());
                Ok(right_value)
            }

            BinaryOperator::Collate
            | BinaryOperator::LogicalAnd
            | BinaryOperator::Binary
            | BinaryOperator::BitwiseXor
            | BinaryOperator::NullSafeEq
            | BinaryOperator::DoublePipe
            | BinaryOperator::Xor
            | BinaryOperator::Sounds
            | BinaryOperator::Any
            | BinaryOperator::Some => Err(ExpressionError::UnimplementedOperator {
                operator: op.operator.as_str().to_string(),
            }),
        }
    }
}

/// Evaluate a binary operation node against a row.
pub fn evaluate_binary_operator(
    session: &Session,
    scope: &mut Scope,
    op: &BinaryOperation,
    row: &Row,
    columns: &ColumnSchemas,
) -> ExpressionResult<Value> {
    ExpressionEvaluator::new(session, scope, row, columns).evaluate_binary_op(op)
}
