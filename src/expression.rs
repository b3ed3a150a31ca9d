//! Expression evaluation framework.
//!
//! This module provides:
//! - Expression AST representation and the binary operator vocabulary
//! - Type inference that works from column schemas alone
//! - Evaluation against a single row, including row-constructor comparison,
//!   LIKE/RLIKE pattern matching and date-interval arithmetic
//! - Session variables written by `@name := value`

pub mod binary;
pub mod error;
pub mod eval;
pub mod expr;
pub mod function;
pub mod operator;
pub mod pattern;
pub mod row;
pub mod scope;
pub mod type_checker;
pub mod unroll;

pub use binary::evaluate_binary_operator;
pub use error::{ExpressionError, ExpressionResult};
pub use eval::{evaluate, ExpressionEvaluator};
pub use expr::{BinaryOperation, ColumnRef, Expression, IntervalUnit, Literal, SubqueryResult};
pub use operator::BinaryOperator;
pub use row::{compare_tuples, validate_row_comparison};
pub use scope::Scope;
pub use type_checker::{binary_operator_schema, get_column_schema, TypeChecker};
pub use unroll::unroll_grouped;
