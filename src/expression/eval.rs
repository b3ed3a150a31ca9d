//! Expression evaluation implementation.
//!
//! `ExpressionEvaluator` walks an expression tree against one candidate row.
//! Leaf nodes resolve here; binary operators, row comparisons and function
//! calls are implemented in their own modules as further `impl` blocks on the
//! same evaluator, so evaluation recurses freely between them.

use crate::access::{Row, Value};
use crate::catalog::{ColumnSchemas, ColumnType};
use crate::expression::scope::Scope;
use crate::expression::type_checker::TypeChecker;
use crate::expression::unroll::unroll_grouped;
use crate::expression::{ColumnRef, Expression, ExpressionError, ExpressionResult, SubqueryResult};
use crate::session::Session;

/// Evaluator for expressions
pub struct ExpressionEvaluator<'a> {
    pub(crate) session: &'a Session,
    /// Variable store, written by `:=`
    pub(crate) scope: &'a mut Scope,
    /// The row to evaluate against
    row: &'a Row,
    /// Schema of the row's columns, for coercion decisions
    columns: &'a ColumnSchemas,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(
        session: &'a Session,
        scope: &'a mut Scope,
        row: &'a Row,
        columns: &'a ColumnSchemas,
    ) -> Self {
        Self {
            session,
            scope,
            row,
            columns,
        }
    }

    /// Evaluate an expression and return the result
    pub fn evaluate(&mut self, expr: &Expression) -> ExpressionResult<Value> {
        match expr {
            Expression::Literal(lit) => Ok(lit.value.clone()),

            Expression::ColumnRef(col) => self.evaluate_column_ref(col),

            Expression::Variable(name) => Ok(self.scope.get(name)),

            Expression::FunctionCall { name, args } => self.evaluate_function(name, args),

            Expression::Interval { .. } => Err(ExpressionError::EvaluationError {
                message: "INTERVAL is only valid as an operand of date arithmetic".to_string(),
            }),

            Expression::Row(_) => Err(ExpressionError::OperandColumnCount { expected: 1 }),

            Expression::Subquery(result) => Ok(grouped_result(result)),

            Expression::BinaryOp(op) => self.evaluate_binary_op(op),
        }
    }

    /// Evaluate the members of a row constructor, each collapsed to a scalar.
    pub fn evaluate_row(&mut self, items: &[Expression]) -> ExpressionResult<Vec<Value>> {
        items
            .iter()
            .map(|item| self.evaluate(item).and_then(unroll_grouped))
            .collect()
    }

    /// Schema type of a sub-expression, resolved without touching row data.
    pub fn column_schema(&self, expr: &Expression) -> ExpressionResult<ColumnType> {
        TypeChecker::new(&*self.scope, self.columns).check(expr)
    }

    /// Evaluate a column reference
    fn evaluate_column_ref(&self, col: &ColumnRef) -> ExpressionResult<Value> {
        self.row
            .get(&col.name)
            .cloned()
            .ok_or_else(|| ExpressionError::UnknownColumn {
                name: col.name.clone(),
            })
    }
}

fn grouped_result(result: &SubqueryResult) -> Value {
    Value::Grouped(
        result
            .rows
            .iter()
            .map(|row| Value::Grouped(row.clone()))
            .collect(),
    )
}

/// Evaluate an expression against a row.
pub fn evaluate(
    session: &Session,
    scope: &mut Scope,
    expr: &Expression,
    row: &Row,
    columns: &ColumnSchemas,
) -> ExpressionResult<Value> {
    ExpressionEvaluator::new(session, scope, row, columns).evaluate(expr)
}
