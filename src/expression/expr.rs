//! Expression AST definitions.

use crate::access::Value;
use crate::catalog::ColumnType;
use crate::expression::operator::BinaryOperator;
use serde::{Deserialize, Serialize};

/// Column reference in an expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Column name, as keyed in the row and the column schemas
    pub name: String,
}

impl ColumnRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Literal value in an expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub value: Value,
}

impl Literal {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn null() -> Self {
        Self { value: Value::Null }
    }

    pub fn integer(val: i64) -> Self {
        Self {
            value: Value::Integer(val),
        }
    }

    pub fn string(val: impl Into<String>) -> Self {
        Self {
            value: Value::Text(val.into()),
        }
    }
}

/// Unit of an `INTERVAL n UNIT` operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IntervalUnit {
    Microsecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl IntervalUnit {
    /// Units that can shift a bare date without introducing a time of day.
    pub fn is_date_unit(&self) -> bool {
        matches!(
            self,
            IntervalUnit::Day
                | IntervalUnit::Week
                | IntervalUnit::Month
                | IntervalUnit::Quarter
                | IntervalUnit::Year
        )
    }
}

/// `left <operator> right`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryOperation {
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    /// Only absent for malformed input; evaluating such a node fails.
    pub right: Option<Box<Expression>>,
    /// Written in a negated surface form (`NOT LIKE`, `IS NOT`, `NOT REGEXP`)
    #[serde(default)]
    pub negated: bool,
}

impl BinaryOperation {
    pub fn new(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Self {
            operator,
            left: Box::new(left),
            right: Some(Box::new(right)),
            negated: false,
        }
    }

    /// XOR mask for the `0`/`1` result: exactly `1` when negated.
    pub fn negated_int(&self) -> i64 {
        self.negated as i64
    }

    /// Apply the surface negation to a predicate outcome.
    pub fn apply_negation(&self, outcome: bool) -> Value {
        Value::Integer(outcome as i64 ^ self.negated_int())
    }
}

/// Materialized result of a sub-query: one value per column per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubqueryResult {
    pub columns: Vec<(String, ColumnType)>,
    pub rows: Vec<Vec<Value>>,
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Literal constant value
    Literal(Literal),

    /// Column reference
    ColumnRef(ColumnRef),

    /// Session variable (`@name`)
    Variable(String),

    /// Function call
    FunctionCall { name: String, args: Vec<Expression> },

    /// `INTERVAL value unit`
    Interval {
        value: Box<Expression>,
        unit: IntervalUnit,
    },

    /// Row constructor `(a, b, ...)`
    Row(Vec<Expression>),

    /// Sub-query whose result is already materialized
    Subquery(SubqueryResult),

    /// Binary operation
    BinaryOp(BinaryOperation),
}

impl Expression {
    /// Create a literal expression
    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(Literal::new(value.into()))
    }

    pub fn null() -> Self {
        Expression::Literal(Literal::null())
    }

    /// Create a column reference expression
    pub fn column(name: impl Into<String>) -> Self {
        Expression::ColumnRef(ColumnRef::new(name))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    pub fn function(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::FunctionCall {
            name: name.into(),
            args,
        }
    }

    pub fn interval(value: Expression, unit: IntervalUnit) -> Self {
        Expression::Interval {
            value: Box::new(value),
            unit,
        }
    }

    pub fn row(items: Vec<Expression>) -> Self {
        Expression::Row(items)
    }

    pub fn subquery(columns: Vec<(String, ColumnType)>, rows: Vec<Vec<Value>>) -> Self {
        Expression::Subquery(SubqueryResult { columns, rows })
    }

    /// Create a binary operation expression
    pub fn binary_op(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::BinaryOp(BinaryOperation::new(op, left, right))
    }

    /// Create a binary operation in its negated surface form (`NOT LIKE`, `IS NOT`)
    pub fn negated_op(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        let mut operation = BinaryOperation::new(op, left, right);
        operation.negated = true;
        Expression::BinaryOp(operation)
    }

    /// Create an AND expression
    pub fn and(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::And, left, right)
    }

    /// Create an OR expression
    pub fn or(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Or, left, right)
    }

    /// Create an equality expression
    pub fn eq(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Eq, left, right)
    }

    /// Create a not-equal expression
    pub fn ne(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::NotEq, left, right)
    }

    pub fn lt(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Lt, left, right)
    }

    pub fn gt(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Gt, left, right)
    }

    /// Create a LIKE expression
    pub fn like(left: Expression, pattern: &str) -> Self {
        Self::binary_op(BinaryOperator::Like, left, Expression::literal(pattern))
    }

    /// Create an `@name := value` assignment
    pub fn assign(name: impl Into<String>, value: Expression) -> Self {
        Self::binary_op(BinaryOperator::Assign, Expression::variable(name), value)
    }

    /// Whether the node is a string literal in the source text.
    pub fn is_string_literal(&self) -> bool {
        matches!(
            self,
            Expression::Literal(Literal {
                value: Value::Text(_)
            })
        )
    }
}
