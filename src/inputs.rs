//! Numeric input handling.
//!
//! Two families of conversion live here:
//!
//! - [`IntoZakatDecimal`] is the strict path. It is used by builders and
//!   price feeds where a bad value should be reported to the operator.
//! - [`coerce_decimal`] and [`coerce_flag`] are the sanitizing path used for
//!   untrusted request payloads. They never fail: anything that is not a
//!   number or a numeric string becomes exactly zero.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::trace;

use crate::types::ZakatError;

/// Trait for converting various types into `Decimal` for Zakat calculations.
///
/// This trait allows users to pass `i32`, `f64`, `&str`, etc. directly into
/// constructors without needing to wrap them in `dec!()` or `Decimal::from()`.
pub trait IntoZakatDecimal {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError>;
}

impl IntoZakatDecimal for Decimal {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
        Ok(self)
    }
}

macro_rules! impl_into_zakat_decimal_int {
    ($($t:ty),*) => {
        $(
            impl IntoZakatDecimal for $t {
                fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
                    Ok(Decimal::from(self))
                }
            }
        )*
    };
}

impl_into_zakat_decimal_int!(i32, u32, i64, u64, isize, usize);

macro_rules! impl_into_zakat_decimal_float {
    ($($t:ty),*) => {
        $(
            impl IntoZakatDecimal for $t {
                fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
                    // Display gives the shortest round-trip form, so 0.1 stays 0.1.
                    parse_decimal(&self.to_string())
                        .ok_or_else(|| ZakatError::invalid_input("value", format!("not a finite decimal: {}", self)))
                }
            }
        )*
    };
}

impl_into_zakat_decimal_float!(f32, f64);

impl IntoZakatDecimal for &str {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
        parse_decimal(self)
            .ok_or_else(|| ZakatError::invalid_input("value", format!("not a number: {:?}", self)))
    }
}

impl IntoZakatDecimal for String {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
        self.as_str().into_zakat_decimal()
    }
}

impl IntoZakatDecimal for &Value {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
        match self {
            Value::Number(n) => number_to_decimal(n)
                .ok_or_else(|| ZakatError::invalid_input("value", format!("number out of range: {}", n))),
            Value::String(s) => s.as_str().into_zakat_decimal(),
            other => Err(ZakatError::invalid_input("value", format!("expected a number, got {}", other))),
        }
    }
}

/// Parses a numeric string. Surrounding whitespace and scientific notation
/// are accepted; `NaN`, infinities and values outside the `Decimal` range are not.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    // Largest magnitude a 96-bit Decimal can hold, rounded down.
    const DECIMAL_LIMIT: f64 = 7.9e28;

    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = Decimal::from_str(s) {
        return Some(d);
    }
    if !s.contains(['e', 'E']) {
        return None;
    }
    let f: f64 = s.parse().ok()?;
    if !f.is_finite() || f.abs() >= DECIMAL_LIMIT {
        return None;
    }
    // f64 Display never uses an exponent.
    Decimal::from_str(&f.to_string()).ok()
}

fn number_to_decimal(n: &serde_json::Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }
    parse_decimal(&n.to_string())
}

/// Sanitizing conversion: `any value -> Decimal`, defaulting to zero.
///
/// Accepts a JSON number or a numeric string. Everything else (null,
/// booleans, arrays, objects, non-numeric strings, numbers too large for a
/// `Decimal`) yields exactly `Decimal::ZERO`. This function never fails.
pub fn coerce_decimal(value: &Value) -> Decimal {
    match value.into_zakat_decimal() {
        Ok(d) => d,
        Err(e) => {
            trace!(%e, "coerced unusable value to zero");
            Decimal::ZERO
        }
    }
}

/// Sanitizing conversion for on/off switches, by truthiness.
///
/// Booleans pass through. Numbers are true when non-zero. Strings, arrays
/// and objects are true when non-empty, so `"false"` is true. Null is false.
pub fn coerce_flag(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// `deserialize_with` helpers that route every field through the sanitizers.
///
/// Each helper first reads the field as an arbitrary JSON value, so it only
/// fails when the underlying data itself is not well-formed.
pub mod lenient {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::nisab::NisabStandard;

    pub fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(super::coerce_decimal(&value))
    }

    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(super::coerce_flag(&value))
    }

    pub fn nisab_basis<'de, D>(deserializer: D) -> Result<NisabStandard, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(NisabStandard::from_basis(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_coerce_native_numbers() {
        assert_eq!(coerce_decimal(&json!(5000)), dec!(5000));
        assert_eq!(coerce_decimal(&json!(-12)), dec!(-12));
        assert_eq!(coerce_decimal(&json!(0.7)), dec!(0.7));
        assert_eq!(coerce_decimal(&json!(1500.25)), dec!(1500.25));
    }

    #[test]
    fn test_coerce_numeric_strings() {
        assert_eq!(coerce_decimal(&json!("1500.50")), dec!(1500.50));
        assert_eq!(coerce_decimal(&json!("  42 ")), dec!(42));
        assert_eq!(coerce_decimal(&json!("1e3")), dec!(1000));
        assert_eq!(coerce_decimal(&json!("-3.5")), dec!(-3.5));
    }

    #[test]
    fn test_coerce_garbage_is_zero() {
        for value in [
            json!(null),
            json!("abc"),
            json!("not-a-number"),
            json!(""),
            json!("NaN"),
            json!(true),
            json!([1, 2, 3]),
            json!({"amount": 10}),
        ] {
            assert_eq!(coerce_decimal(&value), Decimal::ZERO, "value {value} should coerce to zero");
        }
    }

    #[test]
    fn test_coerce_out_of_range_is_zero() {
        assert_eq!(coerce_decimal(&json!(1e40)), Decimal::ZERO);
        assert_eq!(coerce_decimal(&json!("1e40")), Decimal::ZERO);
    }

    #[test]
    fn test_coerce_flag_is_truthiness() {
        for truthy in [json!(true), json!(1), json!(-0.5), json!("yes"), json!("false"), json!("no"), json!(" "), json!([0]), json!({"a": 1})] {
            assert!(coerce_flag(&truthy), "{truthy} should be true");
        }
        for falsy in [json!(false), json!(0), json!(0.0), json!(""), json!(null), json!([]), json!({})] {
            assert!(!coerce_flag(&falsy), "{falsy} should be false");
        }
    }

    #[test]
    fn test_strict_conversion_reports_errors() {
        assert_eq!(100_i32.into_zakat_decimal().unwrap(), dec!(100));
        assert_eq!(0.025_f64.into_zakat_decimal().unwrap(), dec!(0.025));
        assert_eq!("85".into_zakat_decimal().unwrap(), dec!(85));
        assert!("eighty-five".into_zakat_decimal().is_err());
        assert!(f64::NAN.into_zakat_decimal().is_err());
        assert!(f64::INFINITY.into_zakat_decimal().is_err());
    }
}
