//! Error types for expression evaluation.

use thiserror::Error;

/// Errors that abort the evaluation or type inference of an expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// Structurally invalid expression
    #[error("Malformed expression: {message}")]
    MalformedExpression { message: String },

    /// Row constructor on the left, something else on the right
    #[error("Expected row expression on RHS of {operator} operand")]
    RowOperandExpected { operator: String },

    /// Row constructors of different arity
    #[error("Mismatched column count in row comparison expression: {left} vs {right}")]
    RowArityMismatch { left: usize, right: usize },

    /// A row constructor used where a single column is required
    #[error("Operand should contain {expected} column(s)")]
    OperandColumnCount { expected: usize },

    /// Operand of the wrong shape for the operator
    #[error("Unsupported operand for {operator}: {reason}")]
    UnsupportedOperand { operator: String, reason: String },

    /// Sub-query result that does not collapse to a scalar
    #[error("Subquery should return a single column: {reason}")]
    SubqueryShape { reason: String },

    /// Recognized operator token without an implementation
    #[error("Operator {operator} not implemented")]
    UnimplementedOperator { operator: String },

    /// Column missing from both row and schema
    #[error("Unknown column: {name}")]
    UnknownColumn { name: String },

    /// Invalid function name
    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },

    /// Wrong number of function arguments
    #[error("Function {function} expects {expected} arguments, got {actual}")]
    FunctionArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// Pattern that does not compile to a regex
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Date arithmetic on a value that is not a date
    #[error("Invalid datetime value: '{value}'")]
    InvalidDateTime { value: String },

    /// Division by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Generic evaluation error
    #[error("Expression evaluation error: {message}")]
    EvaluationError { message: String },
}

impl ExpressionError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        ExpressionError::MalformedExpression {
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(operator: impl Into<String>, reason: impl Into<String>) -> Self {
        ExpressionError::UnsupportedOperand {
            operator: operator.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for expression operations
pub type ExpressionResult<T> = Result<T, ExpressionError>;
