//! Operator definitions for expressions.

use crate::expression::{ExpressionError, ExpressionResult};
use serde::{Deserialize, Serialize};

/// Binary operators recognized in expressions.
///
/// The vocabulary covers every token the SQL surface syntax can produce
/// between two operands, including those evaluation rejects as
/// unimplemented (`XOR`, `<=>`, `SOUNDS LIKE`...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    // Logical
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,

    // Comparison
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<>", alias = "!=")]
    NotEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    GtEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    LtEq,

    // Arithmetic
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "%", alias = "MOD")]
    Modulo,
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "DIV")]
    IntegerDivide,

    // Bitwise
    #[serde(rename = "<<")]
    ShiftLeft,
    #[serde(rename = ">>")]
    ShiftRight,
    #[serde(rename = "|")]
    BitwiseOr,
    #[serde(rename = "&")]
    BitwiseAnd,

    // Pattern matching and tests
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "IS")]
    Is,
    #[serde(rename = "RLIKE", alias = "REGEXP")]
    RLike,

    // Session variable assignment
    #[serde(rename = ":=")]
    Assign,

    #[serde(rename = "COLLATE")]
    Collate,

    // Recognized but not implemented
    #[serde(rename = "&&")]
    LogicalAnd,
    #[serde(rename = "BINARY")]
    Binary,
    #[serde(rename = "^")]
    BitwiseXor,
    #[serde(rename = "<=>")]
    NullSafeEq,
    #[serde(rename = "||")]
    DoublePipe,
    #[serde(rename = "XOR")]
    Xor,
    #[serde(rename = "SOUNDS")]
    Sounds,
    #[serde(rename = "ANY")]
    Any,
    #[serde(rename = "SOME")]
    Some,
}

impl BinaryOperator {
    /// Parse an operator token as written in SQL. Keywords are case-insensitive.
    ///
    /// For callers that build expressions from SQL text. JSON input goes
    /// through the serde renames instead and never reaches this.
    pub fn from_token(token: &str) -> ExpressionResult<Self> {
        let op = match token.trim().to_ascii_uppercase().as_str() {
            "" => return Err(ExpressionError::malformed("empty operator")),
            "AND" => BinaryOperator::And,
            "OR" => BinaryOperator::Or,
            "=" => BinaryOperator::Eq,
            "<>" | "!=" => BinaryOperator::NotEq,
            ">" => BinaryOperator::Gt,
            ">=" => BinaryOperator::GtEq,
            "<" => BinaryOperator::Lt,
            "<=" => BinaryOperator::LtEq,
            "*" => BinaryOperator::Multiply,
            "%" | "MOD" => BinaryOperator::Modulo,
            "-" => BinaryOperator::Minus,
            "+" => BinaryOperator::Plus,
            "/" => BinaryOperator::Divide,
            "DIV" => BinaryOperator::IntegerDivide,
            "<<" => BinaryOperator::ShiftLeft,
            ">>" => BinaryOperator::ShiftRight,
            "|" => BinaryOperator::BitwiseOr,
            "&" => BinaryOperator::BitwiseAnd,
            "LIKE" => BinaryOperator::Like,
            "IS" => BinaryOperator::Is,
            "RLIKE" | "REGEXP" => BinaryOperator::RLike,
            ":=" => BinaryOperator::Assign,
            "COLLATE" => BinaryOperator::Collate,
            "&&" => BinaryOperator::LogicalAnd,
            "BINARY" => BinaryOperator::Binary,
            "^" => BinaryOperator::BitwiseXor,
            "<=>" => BinaryOperator::NullSafeEq,
            "||" => BinaryOperator::DoublePipe,
            "XOR" => BinaryOperator::Xor,
            "SOUNDS" => BinaryOperator::Sounds,
            "ANY" => BinaryOperator::Any,
            "SOME" => BinaryOperator::Some,
            other => {
                return Err(ExpressionError::UnimplementedOperator {
                    operator: other.to_string(),
                })
            }
        };
        Ok(op)
    }

    /// Comparison operators, the only ones allowed between row constructors.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::NotEq
                | BinaryOperator::Gt
                | BinaryOperator::GtEq
                | BinaryOperator::Lt
                | BinaryOperator::LtEq
        )
    }

    /// Operators whose result is a `0`/`1` truth value.
    pub fn is_predicate(&self) -> bool {
        self.is_comparison()
            || matches!(
                self,
                BinaryOperator::And
                    | BinaryOperator::Or
                    | BinaryOperator::Like
                    | BinaryOperator::Is
                    | BinaryOperator::RLike
            )
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Multiply
                | BinaryOperator::Modulo
                | BinaryOperator::Minus
                | BinaryOperator::Plus
                | BinaryOperator::Divide
                | BinaryOperator::IntegerDivide
                | BinaryOperator::ShiftLeft
                | BinaryOperator::ShiftRight
                | BinaryOperator::BitwiseOr
                | BinaryOperator::BitwiseAnd
        )
    }

    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "<>",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Minus => "-",
            BinaryOperator::Plus => "+",
            BinaryOperator::Divide => "/",
            BinaryOperator::IntegerDivide => "DIV",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::BitwiseOr => "|",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::Like => "LIKE",
            BinaryOperator::Is => "IS",
            BinaryOperator::RLike => "RLIKE",
            BinaryOperator::Assign => ":=",
            BinaryOperator::Collate => "COLLATE",
            BinaryOperator::LogicalAnd => "&&",
            BinaryOperator::Binary => "BINARY",
            BinaryOperator::BitwiseXor => "^",
            BinaryOperator::NullSafeEq => "<=>",
            BinaryOperator::DoublePipe => "||",
            BinaryOperator::Xor => "XOR",
            BinaryOperator::Sounds => "SOUNDS",
            BinaryOperator::Any => "ANY",
            BinaryOperator::Some => "SOME",
        }
    }
}
