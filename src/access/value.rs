//! Dynamically-typed scalar values and the coercion rules applied to them.
//!
//! Comparison and arithmetic operators never look at a value's variant directly.
//! They go through the casts in this module (`is_truthy`, `cast_string`,
//! `cast_float`, `cast_int`) and the loose comparison, which together decide
//! how a string that looks like a number compares against a real number.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Values produced while evaluating an expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// Rows (or columns of a row) of a nested sub-query result that has not
    /// been collapsed to a scalar yet.
    Grouped(Vec<Value>),
}

impl Value {
    /// Encode a predicate outcome as the `0`/`1` integer SQL uses for booleans.
    pub fn truth(b: bool) -> Self {
        Value::Integer(b as i64)
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Boolean interpretation used by `AND`/`OR`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Integer(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Text(s) => !(s.is_empty() || s == "0"),
            Value::Grouped(items) => !items.is_empty(),
        }
    }

    /// String form of the value, as used by string-mode comparisons and pattern matching.
    pub fn cast_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Boolean(true) => "1".to_string(),
            Value::Boolean(false) => String::new(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Text(s) => s.clone(),
            Value::Grouped(_) => "Array".to_string(),
        }
    }

    /// Floating-point form of the value. Strings contribute their leading numeric prefix.
    pub fn cast_float(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Boolean(b) => *b as i64 as f64,
            Value::Integer(i) => *i as f64,
            Value::Float(f) => *f,
            Value::Text(s) => match numeric_prefix(s) {
                Some(Value::Integer(i)) => i as f64,
                Some(Value::Float(f)) => f,
                _ => 0.0,
            },
            Value::Grouped(items) => !items.is_empty() as i64 as f64,
        }
    }

    /// Integer form of the value. Floats truncate toward zero; non-finite or
    /// out-of-range floats become `0`.
    pub fn cast_int(&self) -> i64 {
        match self {
            Value::Null => 0,
            Value::Boolean(b) => *b as i64,
            Value::Integer(i) => *i,
            Value::Float(f) => float_to_int(*f),
            Value::Text(s) => match numeric_prefix(s) {
                Some(Value::Integer(i)) => i,
                Some(Value::Float(f)) => float_to_int(f),
                _ => 0,
            },
            Value::Grouped(items) => !items.is_empty() as i64,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Grouped(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            other => write!(f, "{}", other.cast_string()),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

fn float_to_int(f: f64) -> i64 {
    if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        f.trunc() as i64
    } else {
        0
    }
}

/// Shortest round-trip rendering, switching to exponent form outside `[1e-4, 1e15)`.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "NAN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    let abs = f.abs();
    if abs != 0.0 && !(1e-4..1e15).contains(&abs) {
        let rendered = format!("{:e}", f);
        let (mantissa, exponent) = rendered.split_once('e').unwrap_or((&rendered, "0"));
        let mantissa = if mantissa.contains('.') {
            mantissa.to_string()
        } else {
            format!("{}.0", mantissa)
        };
        let exponent = if exponent.starts_with('-') {
            exponent.to_string()
        } else {
            format!("+{}", exponent)
        };
        return format!("{}E{}", mantissa, exponent);
    }
    format!("{}", f)
}

const WHITESPACE: &[char] = &[' ', '\t', '\n', '\r', '\x0b', '\x0c'];

/// Length of the longest numeric literal at the start of `s`
/// (`[+-]digits[.digits][e[+-]digits]`), and whether it is fractional.
fn scan_number(s: &str) -> Option<(usize, bool)> {
    let bytes = s.as_bytes();
    let mut pos = 0;
    if pos < bytes.len() && (bytes[pos] == b'+' || bytes[pos] == b'-') {
        pos += 1;
    }
    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let mut digits = pos - int_start;
    let mut fractional = false;
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if digits > 0 || end > frac_start {
            digits += end - frac_start;
            fractional = true;
            pos = end;
        }
    }
    if digits == 0 {
        return None;
    }
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut end = pos + 1;
        if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
            end += 1;
        }
        let exp_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > exp_start {
            fractional = true;
            pos = end;
        }
    }
    Some((pos, fractional))
}

fn number_from_literal(literal: &str, fractional: bool) -> Option<Value> {
    if !fractional {
        if let Ok(i) = literal.parse::<i64>() {
            return Some(Value::Integer(i));
        }
    }
    literal.parse::<f64>().ok().map(Value::Float)
}

/// Parse a string that is entirely numeric (surrounding whitespace allowed).
pub fn parse_numeric(s: &str) -> Option<Value> {
    let trimmed = s.trim_start_matches(WHITESPACE);
    let (len, fractional) = scan_number(trimmed)?;
    if !trimmed[len..].trim_end_matches(WHITESPACE).is_empty() {
        return None;
    }
    number_from_literal(&trimmed[..len], fractional)
}

/// Parse the numeric prefix of a string, ignoring whatever follows it.
pub fn numeric_prefix(s: &str) -> Option<Value> {
    let trimmed = s.trim_start_matches(WHITESPACE);
    let (len, fractional) = scan_number(trimmed)?;
    number_from_literal(&trimmed[..len], fractional)
}

fn numeric_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        _ => left.cast_float().partial_cmp(&right.cast_float()),
    }
}

fn is_number(value: &Value) -> bool {
    matches!(value, Value::Integer(_) | Value::Float(_))
}

/// Type-juggling comparison between two values.
///
/// Returns `None` when the pair is unordered (a NaN is involved).
pub fn loose_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, Value::Text(s)) => Some("".cmp(s.as_str())),
        (Value::Text(s), Value::Null) => Some(s.as_str().cmp("")),
        (Value::Boolean(_) | Value::Null, _) | (_, Value::Boolean(_) | Value::Null) => {
            Some(left.is_truthy().cmp(&right.is_truthy()))
        }
        (Value::Grouped(a), Value::Grouped(b)) => {
            if a.len() != b.len() {
                return Some(a.len().cmp(&b.len()));
            }
            for (x, y) in a.iter().zip(b) {
                match loose_cmp(x, y)? {
                    Ordering::Equal => continue,
                    other => return Some(other),
                }
            }
            Some(Ordering::Equal)
        }
        (Value::Grouped(_), _) => Some(Ordering::Greater),
        (_, Value::Grouped(_)) => Some(Ordering::Less),
        (Value::Text(a), Value::Text(b)) => match (parse_numeric(a), parse_numeric(b)) {
            (Some(x), Some(y)) => numeric_cmp(&x, &y),
            _ => Some(a.as_bytes().cmp(b.as_bytes())),
        },
        (Value::Text(s), number) => match parse_numeric(s) {
            Some(parsed) => numeric_cmp(&parsed, number),
            None => Some(s.as_bytes().cmp(number.cast_string().as_bytes())),
        },
        (number, Value::Text(s)) => match parse_numeric(s) {
            Some(parsed) => numeric_cmp(number, &parsed),
            None => Some(number.cast_string().as_bytes().cmp(s.as_bytes())),
        },
        _ if is_number(left) && is_number(right) => numeric_cmp(left, right),
        _ => None,
    }
}

/// Type-juggling equality (`'1' = 1`, `'abc' = 'abc'`, `NULL = 0`).
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    loose_cmp(left, right) == Some(Ordering::Equal)
}

/// Reduce an arithmetic operand to a number: containers collapse to their
/// first element (empty ones to `0`), then the string form decides between
/// float (contains a `.`) and integer.
pub fn extract_numeric(value: &Value) -> Value {
    match value {
        Value::Grouped(items) => match items.first() {
            Some(first) => extract_numeric(first),
            None => Value::Integer(0),
        },
        scalar => {
            let rendered = scalar.cast_string();
            let fractional = rendered.contains('.');
            let text = Value::Text(rendered);
            if fractional {
                Value::Float(text.cast_float())
            } else {
                Value::Integer(text.cast_int())
            }
        }
    }
}

fn matches_shape(bytes: &[u8], shape: &[u8]) -> bool {
    bytes.len() == shape.len()
        && bytes.iter().zip(shape).all(|(b, s)| match s {
            b'9' => b.is_ascii_digit(),
            b'1' => matches!(b, b'0'..=b'1'),
            b'2' => matches!(b, b'0'..=b'2'),
            b'3' => matches!(b, b'0'..=b'3'),
            b'5' => matches!(b, b'0'..=b'5'),
            other => b == other,
        })
}

/// `YY(YY)-MM-DD`, year of 2 to 4 digits.
pub fn is_date_string(s: &str) -> bool {
    let bytes = s.as_bytes();
    let Some(dash) = bytes.iter().position(|b| *b == b'-') else {
        return false;
    };
    (2..=4).contains(&dash)
        && bytes[..dash].iter().all(u8::is_ascii_digit)
        && matches_shape(&bytes[dash..], b"-19-39")
}

/// `YY(YY)-MM-DD HH:MM:SS`, year of 2 to 4 digits.
pub fn is_datetime_string(s: &str) -> bool {
    match s.split_once(' ') {
        Some((date, time)) => is_date_string(date) && matches_shape(time.as_bytes(), b"29:59:59"),
        None => false,
    }
}

/// When one side is a datetime string and the other a bare date, extend the
/// bare date with a midnight time so the two compare on equal footing.
pub fn normalize_date_operands(left: &mut Value, right: &mut Value) {
    if let (Value::Text(l), Value::Text(r)) = (left, right) {
        if is_datetime_string(l) && is_date_string(r) {
            r.push_str(" 00:00:00");
        } else if is_datetime_string(r) && is_date_string(l) {
            l.push_str(" 00:00:00");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Integer(0).is_truthy());
        assert!(Value::Integer(-3).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::text("").is_truthy());
        assert!(!Value::text("0").is_truthy());
        assert!(Value::text("0.0").is_truthy());
        assert!(Value::text("abc").is_truthy());
        assert!(Value::Boolean(true).is_truthy());
    }

    #[test]
    fn test_casts() {
        assert_eq!(Value::Float(3.5).cast_string(), "3.5");
        assert_eq!(Value::Float(3.0).cast_string(), "3");
        assert_eq!(Value::Float(1e20).cast_string(), "1.0E+20");
        assert_eq!(Value::Boolean(true).cast_string(), "1");
        assert_eq!(Value::Null.cast_string(), "");

        assert_eq!(Value::text("12abc").cast_int(), 12);
        assert_eq!(Value::text("  7.9").cast_int(), 7);
        assert_eq!(Value::text("1e3").cast_int(), 1000);
        assert_eq!(Value::text("abc").cast_int(), 0);
        assert_eq!(Value::Float(-2.7).cast_int(), -2);
        assert_eq!(Value::Float(f64::NAN).cast_int(), 0);

        assert_eq!(Value::text("2.5kg").cast_float(), 2.5);
        assert_eq!(Value::text(".5").cast_float(), 0.5);
        assert_eq!(Value::Null.cast_float(), 0.0);
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("42"), Some(Value::Integer(42)));
        assert_eq!(parse_numeric(" -1.5 "), Some(Value::Float(-1.5)));
        assert_eq!(parse_numeric("1e2"), Some(Value::Float(100.0)));
        assert_eq!(parse_numeric("12abc"), None);
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("."), None);
    }

    #[test]
    fn test_loose_equality() {
        assert!(loose_eq(&Value::text("1"), &Value::Integer(1)));
        assert!(loose_eq(&Value::text("1.0"), &Value::text("1")));
        assert!(loose_eq(&Value::Integer(2), &Value::Float(2.0)));
        assert!(loose_eq(&Value::Null, &Value::Integer(0)));
        assert!(loose_eq(&Value::Null, &Value::text("")));
        assert!(!loose_eq(&Value::Null, &Value::text("0")));
        assert!(!loose_eq(&Value::text("abc"), &Value::Integer(0)));
        assert!(loose_eq(&Value::text("abc"), &Value::text("abc")));
        assert!(!loose_eq(&Value::text("abc"), &Value::text("ABC")));
        assert!(!loose_eq(&Value::Float(f64::NAN), &Value::Float(f64::NAN)));
    }

    #[test]
    fn test_loose_ordering() {
        assert_eq!(
            loose_cmp(&Value::text("10"), &Value::text("9")),
            Some(Ordering::Greater)
        );
        assert_eq!(
            loose_cmp(&Value::text("abc"), &Value::text("abd")),
            Some(Ordering::Less)
        );
        assert_eq!(
            loose_cmp(&Value::Integer(3), &Value::Float(2.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            loose_cmp(&Value::Integer(5), &Value::text("abc")),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_extract_numeric() {
        let nested = Value::Grouped(vec![Value::Grouped(vec![Value::text("3.5")])]);
        assert_eq!(extract_numeric(&nested), Value::Float(3.5));
        assert_eq!(
            extract_numeric(&Value::Grouped(vec![])),
            Value::Integer(0)
        );
        assert_eq!(extract_numeric(&Value::text("7")), Value::Integer(7));
        assert_eq!(extract_numeric(&Value::Float(4.0)), Value::Integer(4));
        assert_eq!(extract_numeric(&Value::Null), Value::Integer(0));
    }

    #[test]
    fn test_date_shapes() {
        assert!(is_date_string("2024-01-05"));
        assert!(is_date_string("24-01-05"));
        assert!(!is_date_string("2024-1-05"));
        assert!(!is_date_string("12345-01-05"));
        assert!(is_datetime_string("2024-01-05 13:45:00"));
        assert!(!is_datetime_string("2024-01-05 13:65:00"));
        assert!(!is_datetime_string("2024-01-05"));
    }

    #[test]
    fn test_normalize_date_operands() {
        let mut left = Value::text("2024-01-05 00:00:00");
        let mut right = Value::text("2024-01-05");
        normalize_date_operands(&mut left, &mut right);
        assert_eq!(right, Value::text("2024-01-05 00:00:00"));

        let mut left = Value::text("2024-01-05");
        let mut right = Value::text("2024-01-05 10:00:00");
        normalize_date_operands(&mut left, &mut right);
        assert_eq!(left, Value::text("2024-01-05 00:00:00"));

        let mut left = Value::text("2024-01-05");
        let mut right = Value::text("2024-01-06");
        normalize_date_operands(&mut left, &mut right);
        assert_eq!(left, Value::text("2024-01-05"));
        assert_eq!(right, Value::text("2024-01-06"));
    }
}
