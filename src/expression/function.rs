//! Function calls reachable from binary operators: date-interval arithmetic
//! and the `BINARY` marker.

use crate::access::{extract_numeric, Value};
use crate::expression::eval::ExpressionEvaluator;
use crate::expression::expr::IntervalUnit;
use crate::expression::unroll::unroll_grouped;
use crate::expression::{Expression, ExpressionError, ExpressionResult};
use chrono::{Duration, Months, NaiveDate, NaiveDateTime};

pub const DATE_ADD: &str = "DATE_ADD";
pub const DATE_SUB: &str = "DATE_SUB";
pub const BINARY: &str = "BINARY";

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether an expression is a `BINARY(...)` call, which makes RLIKE case-sensitive.
pub fn is_binary_marker(expr: &Expression) -> bool {
    matches!(expr, Expression::FunctionCall { name, .. } if name.eq_ignore_ascii_case(BINARY))
}

fn expect_args(function: &str, args: &[Expression], expected: usize) -> ExpressionResult<()> {
    if args.len() != expected {
        return Err(ExpressionError::FunctionArgumentCount {
            function: function.to_string(),
            expected,
            actual: args.len(),
        });
    }
    Ok(())
}

impl ExpressionEvaluator<'_> {
    /// Evaluate a function call
    pub fn evaluate_function(&mut self, name: &str, args: &[Expression]) -> ExpressionResult<Value> {
        let upper = name.to_ascii_uppercase();
        match upper.as_str() {
            DATE_ADD | DATE_SUB => {
                expect_args(&upper, args, 2)?;
                self.evaluate_date_arithmetic(upper == DATE_SUB, &args[0], &args[1])
            }
            BINARY => {
                expect_args(BINARY, args, 1)?;
                self.evaluate(&args[0])
            }
            _ => Err(ExpressionError::UnknownFunction {
                name: name.to_string(),
            }),
        }
    }

    /// `DATE_ADD(date, INTERVAL n unit)` / `DATE_SUB(...)`.
    pub(crate) fn evaluate_date_arithmetic(
        &mut self,
        subtract: bool,
        date: &Expression,
        interval: &Expression,
    ) -> ExpressionResult<Value> {
        let Expression::Interval { value, unit } = interval else {
            return Err(ExpressionError::unsupported(
                if subtract { DATE_SUB } else { DATE_ADD },
                "second argument must be an INTERVAL",
            ));
        };

        let base = unroll_grouped(self.evaluate(date)?)?;
        let amount = unroll_grouped(self.evaluate(value)?)?;
        if base.is_null() || amount.is_null() {
            return Ok(Value::Null);
        }

        let amount = extract_numeric(&amount).cast_int();
        let amount = if subtract {
            amount.checked_neg().ok_or_else(|| ExpressionError::EvaluationError {
                message: format!("interval amount {} out of range", amount),
            })?
        } else {
            amount
        };

        shift_date_string(&base.cast_string(), *unit, amount)
    }
}

/// Shift a `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS` string by `amount` units.
///
/// A bare date shifted by a day-or-larger unit stays a bare date.
pub fn shift_date_string(input: &str, unit: IntervalUnit, amount: i64) -> ExpressionResult<Value> {
    let invalid = || ExpressionError::InvalidDateTime {
        value: input.to_string(),
    };
    let trimmed = input.trim();

    let (start, date_only) = match NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT) {
        Ok(dt) => (dt, false),
        Err(_) => {
            let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| invalid())?;
            (date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?, true)
        }
    };

    let shifted = shift(start, unit, amount).ok_or_else(|| ExpressionError::EvaluationError {
        message: format!("date arithmetic overflow on '{}'", input),
    })?;

    let formatted = if date_only && unit.is_date_unit() {
        shifted.format(DATE_FORMAT).to_string()
    } else {
        shifted.format("%Y-%m-%d %H:%M:%S%.f").to_string()
    };
    Ok(Value::Text(formatted))
}

fn shift(start: NaiveDateTime, unit: IntervalUnit, amount: i64) -> Option<NaiveDateTime> {
    let delta = match unit {
        IntervalUnit::Microsecond => Duration::microseconds(amount),
        IntervalUnit::Second => Duration::try_seconds(amount)?,
        IntervalUnit::Minute => Duration::try_minutes(amount)?,
        IntervalUnit::Hour => Duration::try_hours(amount)?,
        IntervalUnit::Day => Duration::try_days(amount)?,
        IntervalUnit::Week => Duration::try_weeks(amount)?,
        IntervalUnit::Month => return shift_months(start, amount),
        IntervalUnit::Quarter => return shift_months(start, amount.checked_mul(3)?),
        IntervalUnit::Year => return shift_months(start, amount.checked_mul(12)?),
    };
    start.checked_add_signed(delta)
}

fn shift_months(start: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let count = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        start.checked_add_months(count)
    } else {
        start.checked_sub_months(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_date_units() {
        assert_eq!(
            shift_date_string("2024-01-31", IntervalUnit::Day, 1).unwrap(),
            Value::text("2024-02-01")
        );
        assert_eq!(
            shift_date_string("2024-01-31", IntervalUnit::Month, 1).unwrap(),
            Value::text("2024-02-29")
        );
        assert_eq!(
            shift_date_string("2024-03-01", IntervalUnit::Year, -1).unwrap(),
            Value::text("2023-03-01")
        );
        assert_eq!(
            shift_date_string("2024-01-01", IntervalUnit::Quarter, 1).unwrap(),
            Value::text("2024-04-01")
        );
    }

    #[test]
    fn test_shift_time_units() {
        assert_eq!(
            shift_date_string("2024-01-01", IntervalUnit::Hour, 5).unwrap(),
            Value::text("2024-01-01 05:00:00")
        );
        assert_eq!(
            shift_date_string("2024-01-01 23:59:30", IntervalUnit::Second, 45).unwrap(),
            Value::text("2024-01-02 00:00:15")
        );
        assert_eq!(
            shift_date_string("2024-01-10 12:00:00", IntervalUnit::Week, -1).unwrap(),
            Value::text("2024-01-03 12:00:00")
        );
    }

    #[test]
    fn test_invalid_dates() {
        assert!(matches!(
            shift_date_string("not a date", IntervalUnit::Day, 1),
            Err(ExpressionError::InvalidDateTime { .. })
        ));
        assert!(matches!(
            shift_date_string("2024-02-30", IntervalUnit::Day, 1),
            Err(ExpressionError::InvalidDateTime { .. })
        ));
    }

    #[test]
    fn test_binary_marker() {
        assert!(is_binary_marker(&Expression::function(
            "binary",
            vec![Expression::literal("a")]
        )));
        assert!(!is_binary_marker(&Expression::function(
            "LOWER",
            vec![Expression::literal("a")]
        )));
        assert!(!is_binary_marker(&Expression::literal("BINARY")));
    }
}
