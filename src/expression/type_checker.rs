//! Type inference for expressions.
//!
//! Infers the column type an expression would produce without evaluating it
//! against row data. The evaluator consults it to decide whether a comparison
//! runs in string mode, and callers use it to describe result columns.

use crate::access::Value;
use crate::catalog::{ColumnSchemas, ColumnType};
use crate::expression::function::{BINARY, DATE_ADD, DATE_SUB};
use crate::expression::scope::Scope;
use crate::expression::{
    BinaryOperation, BinaryOperator, Expression, ExpressionError, ExpressionResult,
};

/// Type checker for expressions
pub struct TypeChecker<'a> {
    /// Variables, typed by their current value
    scope: &'a Scope,
    /// Schema defining the types of input columns
    columns: &'a ColumnSchemas,
}

impl<'a> TypeChecker<'a> {
    pub fn new(scope: &'a Scope, columns: &'a ColumnSchemas) -> Self {
        Self { scope, columns }
    }

    /// Type check an expression and return its output type
    pub fn check(&self, expr: &Expression) -> ExpressionResult<ColumnType> {
        match expr {
            Expression::Literal(lit) => Ok(value_type(&lit.value)),

            Expression::ColumnRef(col) => {
                self.columns
                    .get(&col.name)
                    .copied()
                    .ok_or_else(|| ExpressionError::UnknownColumn {
                        name: col.name.clone(),
                    })
            }

            Expression::Variable(name) => Ok(value_type(&self.scope.get(name))),

            Expression::FunctionCall { name, args } => {
                let upper = name.to_ascii_uppercase();
                match upper.as_str() {
                    DATE_ADD | DATE_SUB => Ok(ColumnType::DateTime),
                    BINARY => match args.first() {
                        Some(arg) => self.check(arg),
                        None => Err(ExpressionError::FunctionArgumentCount {
                            function: BINARY.to_string(),
                            expected: 1,
                            actual: 0,
                        }),
                    },
                    _ => Err(ExpressionError::UnknownFunction { name: name.clone() }),
                }
            }

            Expression::Interval { .. } => Ok(ColumnType::varchar(255)),

            Expression::Row(_) => Err(ExpressionError::OperandColumnCount { expected: 1 }),

            Expression::Subquery(result) => Ok(result
                .columns
                .first()
                .map(|(_, column_type)| *column_type)
                .unwrap_or(ColumnType::Null)),

            Expression::BinaryOp(op) => self.check_binary_op(op),
        }
    }

    fn check_binary_op(&self, op: &BinaryOperation) -> ExpressionResult<ColumnType> {
        if let Expression::Row(left_items) = &*op.left {
            let Some(Expression::Row(right_items)) = op.right.as_deref() else {
                return Err(ExpressionError::RowOperandExpected {
                    operator: op.operator.as_str().to_string(),
                });
            };
            if left_items.len() != right_items.len() {
                return Err(ExpressionError::RowArityMismatch {
                    left: left_items.len(),
                    right: right_items.len(),
                });
            }
            return Ok(ColumnType::boolean());
        }

        let Some(right) = op.right.as_deref() else {
            return Err(ExpressionError::malformed(format!(
                "{} operator with no right operand",
                op.operator.as_str()
            )));
        };

        if matches!(right, Expression::Interval { .. })
            && matches!(op.operator, BinaryOperator::Plus | BinaryOperator::Minus)
        {
            return Ok(ColumnType::DateTime);
        }

        if op.operator == BinaryOperator::Collate {
            return Ok(ColumnType::varchar(255));
        }

        let left_type = self.check(&op.left)?;
        let right_type = self.check(right)?;
        Ok(binary_operator_schema(op.operator, left_type, right_type))
    }
}

/// Result type of `left <operator> right` given the operand types.
pub fn binary_operator_schema(
    operator: BinaryOperator,
    left: ColumnType,
    right: ColumnType,
) -> ColumnType {
    let numeric = || {
        if left.is_integer() && right.is_integer() {
            ColumnType::int(false, 11)
        } else {
            ColumnType::float(10, 2)
        }
    };

    match operator {
        op if op.is_predicate() => ColumnType::boolean(),
        BinaryOperator::Plus | BinaryOperator::Minus | BinaryOperator::Multiply => numeric(),
        BinaryOperator::Modulo => {
            if left.is_integer() {
                ColumnType::int(true, 11)
            } else {
                ColumnType::float(10, 2)
            }
        }
        BinaryOperator::IntegerDivide => ColumnType::int(false, 11),
        BinaryOperator::Divide => ColumnType::float(10, 2),
        BinaryOperator::ShiftLeft
        | BinaryOperator::ShiftRight
        | BinaryOperator::BitwiseOr
        | BinaryOperator::BitwiseAnd => ColumnType::int(false, 11),
        BinaryOperator::Assign => right,
        _ => ColumnType::varchar(255),
    }
}

/// Type of a literal or variable, from its runtime value.
fn value_type(value: &Value) -> ColumnType {
    match value {
        Value::Null => ColumnType::Null,
        Value::Boolean(_) => ColumnType::boolean(),
        Value::Integer(_) => ColumnType::int(false, 11),
        Value::Float(_) => ColumnType::Double,
        Value::Text(s) => ColumnType::varchar(s.chars().count() as u32),
        Value::Grouped(items) => items.first().map(value_type).unwrap_or(ColumnType::Null),
    }
}

/// Helper function to infer the type of an expression
pub fn get_column_schema(
    expr: &Expression,
    scope: &Scope,
    columns: &ColumnSchemas,
) -> ExpressionResult<ColumnType> {
    TypeChecker::new(scope, columns).check(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::expr::IntervalUnit;

    fn schema() -> ColumnSchemas {
        ColumnSchemas::from([
            ("id".to_string(), ColumnType::int(false, 11)),
            ("price".to_string(), ColumnType::float(10, 2)),
            ("name".to_string(), ColumnType::varchar(64)),
            ("created".to_string(), ColumnType::DateTime),
        ])
    }

    fn check(expr: &Expression) -> ExpressionResult<ColumnType> {
        let mut scope = Scope::new();
        scope.set("n", Value::Integer(3));
        get_column_schema(expr, &scope, &schema())
    }

    fn lit(value: impl Into<Value>) -> Expression {
        Expression::literal(value)
    }

    #[test]
    fn test_leaf_types() {
        assert_eq!(check(&lit(1i64)).unwrap(), ColumnType::int(false, 11));
        assert_eq!(check(&lit(1.5)).unwrap(), ColumnType::Double);
        assert_eq!(check(&lit("héllo")).unwrap(), ColumnType::varchar(5));
        assert_eq!(check(&Expression::null()).unwrap(), ColumnType::Null);
        assert_eq!(check(&lit(true)).unwrap(), ColumnType::boolean());
        assert_eq!(
            check(&Expression::column("created")).unwrap(),
            ColumnType::DateTime
        );
        assert_eq!(
            check(&Expression::variable("n")).unwrap(),
            ColumnType::int(false, 11)
        );
        assert_eq!(check(&Expression::variable("unset")).unwrap(), ColumnType::Null);
        assert!(matches!(
            check(&Expression::column("missing")),
            Err(ExpressionError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_predicates_are_boolean() {
        for operator in [
            BinaryOperator::And,
            BinaryOperator::Or,
            BinaryOperator::Eq,
            BinaryOperator::NotEq,
            BinaryOperator::Lt,
            BinaryOperator::Like,
            BinaryOperator::Is,
            BinaryOperator::RLike,
        ] {
            let expr = Expression::binary_op(operator, Expression::column("name"), lit("x"));
            assert_eq!(check(&expr).unwrap(), ColumnType::boolean(), "{:?}", operator);
        }
    }

    #[test]
    fn test_arithmetic_types() {
        let int_plus = Expression::binary_op(BinaryOperator::Plus, Expression::column("id"), lit(1i64));
        assert_eq!(check(&int_plus).unwrap(), ColumnType::int(false, 11));

        let mixed = Expression::binary_op(
            BinaryOperator::Multiply,
            Expression::column("id"),
            Expression::column("price"),
        );
        assert_eq!(check(&mixed).unwrap(), ColumnType::float(10, 2));

        let div = Expression::binary_op(BinaryOperator::Divide, lit(4i64), lit(2i64));
        assert_eq!(check(&div).unwrap(), ColumnType::float(10, 2));

        let int_div = Expression::binary_op(BinaryOperator::IntegerDivide, lit(4.5), lit(2i64));
        assert_eq!(check(&int_div).unwrap(), ColumnType::int(false, 11));

        let modulo = Expression::binary_op(BinaryOperator::Modulo, lit(7i64), lit(2.5));
        assert_eq!(check(&modulo).unwrap(), ColumnType::int(true, 11));
        assert_eq!(check(&modulo).unwrap().to_string(), "INT(11) UNSIGNED");

        let float_modulo = Expression::binary_op(BinaryOperator::Modulo, lit(7.5), lit(2i64));
        assert_eq!(check(&float_modulo).unwrap(), ColumnType::float(10, 2));

        let shift = Expression::binary_op(BinaryOperator::ShiftLeft, lit(1.5), lit(2i64));
        assert_eq!(check(&shift).unwrap(), ColumnType::int(false, 11));
    }

    #[test]
    fn test_special_forms() {
        let interval = Expression::binary_op(
            BinaryOperator::Plus,
            Expression::column("created"),
            Expression::interval(lit(1i64), IntervalUnit::Day),
        );
        assert_eq!(check(&interval).unwrap(), ColumnType::DateTime);

        let collate = Expression::binary_op(
            BinaryOperator::Collate,
            Expression::column("id"),
            lit("utf8mb4_bin"),
        );
        assert_eq!(check(&collate).unwrap(), ColumnType::varchar(255));

        let assign = Expression::assign("x", Expression::column("price"));
        assert_eq!(check(&assign).unwrap(), ColumnType::float(10, 2));

        let binary = Expression::function("binary", vec![Expression::column("name")]);
        assert_eq!(check(&binary).unwrap(), ColumnType::varchar(64));

        let xor = Expression::binary_op(BinaryOperator::Xor, lit(1i64), lit(0i64));
        assert_eq!(check(&xor).unwrap(), ColumnType::varchar(255));
    }

    #[test]
    fn test_rows_and_subqueries() {
        let rows = Expression::eq(
            Expression::row(vec![lit(1i64), lit(2i64)]),
            Expression::row(vec![lit(1i64), lit(2i64)]),
        );
        assert_eq!(check(&rows).unwrap(), ColumnType::boolean());

        // (1) + (1) only fails once evaluated
        let row_sum = Expression::binary_op(
            BinaryOperator::Plus,
            Expression::row(vec![lit(1i64)]),
            Expression::row(vec![lit(1i64)]),
        );
        assert_eq!(check(&row_sum).unwrap(), ColumnType::boolean());

        let mismatched = Expression::eq(
            Expression::row(vec![lit(1i64)]),
            Expression::row(vec![lit(1i64), lit(2i64)]),
        );
        assert!(matches!(
            check(&mismatched),
            Err(ExpressionError::RowArityMismatch { .. })
        ));

        assert!(matches!(
            check(&Expression::row(vec![lit(1i64)])),
            Err(ExpressionError::OperandColumnCount { expected: 1 })
        ));

        let sub = Expression::subquery(vec![("d".to_string(), ColumnType::Date)], vec![]);
        assert_eq!(check(&sub).unwrap(), ColumnType::Date);
        assert_eq!(
            check(&Expression::subquery(vec![], vec![])).unwrap(),
            ColumnType::Null
        );
    }

    #[test]
    fn test_every_operator_infers_without_row() {
        let scope = Scope::new();
        let columns = ColumnSchemas::new();
        let int = ColumnType::int(false, 11);
        let cases = [
            (BinaryOperator::And, ColumnType::boolean()),
            (BinaryOperator::Or, ColumnType::boolean()),
            (BinaryOperator::Eq, ColumnType::boolean()),
            (BinaryOperator::NotEq, ColumnType::boolean()),
            (BinaryOperator::Gt, ColumnType::boolean()),
            (BinaryOperator::GtEq, ColumnType::boolean()),
            (BinaryOperator::Lt, ColumnType::boolean()),
            (BinaryOperator::LtEq, ColumnType::boolean()),
            (BinaryOperator::Multiply, int),
            (BinaryOperator::Modulo, ColumnType::int(true, 11)),
            (BinaryOperator::Minus, int),
            (BinaryOperator::Plus, int),
            (BinaryOperator::Divide, ColumnType::float(10, 2)),
            (BinaryOperator::IntegerDivide, int),
            (BinaryOperator::ShiftLeft, int),
            (BinaryOperator::ShiftRight, int),
            (BinaryOperator::BitwiseOr, int),
            (BinaryOperator::BitwiseAnd, int),
            (BinaryOperator::Like, ColumnType::boolean()),
            (BinaryOperator::Is, ColumnType::boolean()),
            (BinaryOperator::RLike, ColumnType::boolean()),
            (BinaryOperator::Assign, int),
            (BinaryOperator::Collate, ColumnType::varchar(255)),
            (BinaryOperator::LogicalAnd, ColumnType::varchar(255)),
            (BinaryOperator::Binary, ColumnType::varchar(255)),
            (BinaryOperator::BitwiseXor, ColumnType::varchar(255)),
            (BinaryOperator::NullSafeEq, ColumnType::varchar(255)),
            (BinaryOperator::DoublePipe, ColumnType::varchar(255)),
            (BinaryOperator::Xor, ColumnType::varchar(255)),
            (BinaryOperator::Sounds, ColumnType::varchar(255)),
            (BinaryOperator::Any, ColumnType::varchar(255)),
            (BinaryOperator::Some, ColumnType::varchar(255)),
        ];
        for (operator, expected) in cases {
            let left = match operator {
                BinaryOperator::Assign => Expression::variable("v"),
                _ => lit(7i64),
            };
            let expr = Expression::binary_op(operator, left, lit(2i64));
            assert_eq!(
                get_column_schema(&expr, &scope, &columns).unwrap(),
                expected,
                "{:?}",
                operator
            );
        }
    }

    #[test]
    fn test_missing_right_operand() {
        let expr = Expression::BinaryOp(BinaryOperation {
            operator: BinaryOperator::Plus,
            left: Box::new(lit(1i64)),
            right: None,
            negated: false,
        });
        assert!(matches!(
            check(&expr),
            Err(ExpressionError::MalformedExpression { .. })
        ));
    }
}
