//! Column schema types inferred for expression results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inferred SQL type of a column or expression result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Small fixed-width integer, also the type of every predicate result
    TinyInt { unsigned: bool, width: u8 },
    Int { unsigned: bool, width: u8 },
    BigInt { unsigned: bool, width: u8 },
    Float { precision: u8, scale: u8 },
    Double,
    Varchar(u32),
    Char(u32),
    Text,
    Date,
    DateTime,
    /// Type of a bare `NULL`
    Null,
}

impl ColumnType {
    /// The boolean-like `TINYINT(1) UNSIGNED` used for predicate results.
    pub fn boolean() -> Self {
        ColumnType::TinyInt {
            unsigned: true,
            width: 1,
        }
    }

    pub fn int(unsigned: bool, width: u8) -> Self {
        ColumnType::Int { unsigned, width }
    }

    pub fn float(precision: u8, scale: u8) -> Self {
        ColumnType::Float { precision, scale }
    }

    pub fn varchar(length: u32) -> Self {
        ColumnType::Varchar(length)
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ColumnType::TinyInt { .. } | ColumnType::Int { .. } | ColumnType::BigInt { .. }
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ColumnType::Float { .. } | ColumnType::Double)
    }

    /// Whether values of this type are carried as strings. Dates count, so a
    /// `DATETIME` column compares against a date literal as text.
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            ColumnType::Varchar(_)
                | ColumnType::Char(_)
                | ColumnType::Text
                | ColumnType::Date
                | ColumnType::DateTime
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = |unsigned: bool| if unsigned { " UNSIGNED" } else { "" };
        match self {
            ColumnType::TinyInt { unsigned, width } => {
                write!(f, "TINYINT({}){}", width, sign(*unsigned))
            }
            ColumnType::Int { unsigned, width } => write!(f, "INT({}){}", width, sign(*unsigned)),
            ColumnType::BigInt { unsigned, width } => {
                write!(f, "BIGINT({}){}", width, sign(*unsigned))
            }
            ColumnType::Float { precision, scale } => write!(f, "FLOAT({},{})", precision, scale),
            ColumnType::Double => write!(f, "DOUBLE"),
            ColumnType::Varchar(len) => write!(f, "VARCHAR({})", len),
            ColumnType::Char(len) => write!(f, "CHAR({})", len),
            ColumnType::Text => write!(f, "TEXT"),
            ColumnType::Date => write!(f, "DATE"),
            ColumnType::DateTime => write!(f, "DATETIME"),
            ColumnType::Null => write!(f, "NULL"),
        }
    }
}
