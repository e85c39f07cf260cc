//! Conversion between wire floats and the exact decimals stored in NUMERIC columns.
//!
//! Both directions go through the shortest decimal text form of the value, so
//! `1013.25` is stored as `1013.25` and read back as the float literal `1013.25`
//! rather than its nearest binary neighbour.

use crate::error::{AppError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Precision and scale of a NUMERIC(p,s) column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub precision: u32,
    pub scale: u32,
}

/// temperature, wind_speed, visibility, feels_like
pub const NUMERIC_5_2: Column = Column {
    precision: 5,
    scale: 2,
};

/// pressure
pub const NUMERIC_7_2: Column = Column {
    precision: 7,
    scale: 2,
};

/// uv_index
pub const NUMERIC_3_1: Column = Column {
    precision: 3,
    scale: 1,
};

impl Column {
    /// Smallest magnitude the column can no longer hold
    pub fn limit(&self) -> Decimal {
        Decimal::from(10u64.pow(self.precision - self.scale))
    }
}

/// Convert a float into the decimal that the store will hold for `column`.
///
/// Rounds half away from zero, matching what PostgreSQL does when a NUMERIC
/// column receives a value with more fractional digits than its scale. Values
/// whose rounded magnitude overflows the column are rejected here, so every
/// store sees only values PostgreSQL would accept.
pub fn to_storage(field: &'static str, value: f64, column: Column) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(AppError::invalid_input(field, "must be a finite number"));
    }

    // f64's Display is the shortest text that round-trips and never uses exponents
    let decimal = Decimal::from_str(&value.to_string())
        .map_err(|_| AppError::invalid_input(field, format!("{} cannot be stored", value)))?
        .round_dp_with_strategy(column.scale, RoundingStrategy::MidpointAwayFromZero);

    if decimal.abs() >= column.limit() {
        return Err(AppError::invalid_input(
            field,
            format!("{} must be less than {} in magnitude", value, column.limit()),
        ));
    }

    Ok(decimal)
}

/// Convert a stored decimal into the nearest float.
pub fn from_storage(value: Decimal) -> f64 {
    // Decimal's Display output is always valid float syntax
    value
        .normalize()
        .to_string()
        .parse::<f64>()
        .unwrap_or_else(|_| value.to_f64().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressure_round_trips_exactly() {
        let stored = to_storage("pressure", 1013.25, NUMERIC_7_2).unwrap();
        assert_eq!(stored.to_string(), "1013.25");
        assert_eq!(from_storage(stored), 1013.25);
    }

    #[test]
    fn test_values_that_are_inexact_in_binary() {
        for value in [3.2, 14.2, 0.1, -12.34, 999.99] {
            let stored = to_storage("temperature", value, NUMERIC_5_2).unwrap();
            assert_eq!(from_storage(stored), value);
        }
    }

    #[test]
    fn test_rounds_to_column_scale_half_away_from_zero() {
        let stored = to_storage("temperature", 15.555, NUMERIC_5_2).unwrap();
        assert_eq!(stored.to_string(), "15.56");

        let stored = to_storage("temperature", -0.125, NUMERIC_5_2).unwrap();
        assert_eq!(stored.to_string(), "-0.13");

        let stored = to_storage("uv_index", 4.45, NUMERIC_3_1).unwrap();
        assert_eq!(stored.to_string(), "4.5");
    }

    #[test]
    fn test_trailing_zeros_do_not_leak_into_float() {
        let stored = Decimal::from_str("10.00").unwrap();
        assert_eq!(from_storage(stored), 10.0);
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let err = to_storage("feels_like", f64::NAN, NUMERIC_5_2).unwrap_err();
        assert!(err.to_string().contains("feels_like"));

        assert!(to_storage("feels_like", f64::INFINITY, NUMERIC_5_2).is_err());
    }

    #[test]
    fn test_values_beyond_decimal_range_are_rejected() {
        let err = to_storage("pressure", 1e30, NUMERIC_7_2).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { field: "pressure", .. }));
    }

    #[test]
    fn test_values_beyond_column_precision_are_rejected() {
        for value in [1000.0, -1000.0, 999.995, 1e20] {
            let err = to_storage("temperature", value, NUMERIC_5_2).unwrap_err();
            assert!(matches!(err, AppError::InvalidInput { field: "temperature", .. }));
        }

        assert!(to_storage("temperature", -999.99, NUMERIC_5_2).is_ok());
        assert!(to_storage("pressure", 99999.99, NUMERIC_7_2).is_ok());
        assert!(to_storage("pressure", 100000.0, NUMERIC_7_2).is_err());
    }
}
