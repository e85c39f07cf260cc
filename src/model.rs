//! Wire types of the weather API and the constraint checks applied to them.

use crate::db::models::NewWeather;
use crate::decimal::{to_storage, NUMERIC_3_1, NUMERIC_5_2, NUMERIC_7_2};
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One weather observation as returned to API callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub id: i32,
    pub city: String,
    pub country: String,
    /// Celsius
    pub temperature: f64,
    /// Percent, 0-100
    pub humidity: i32,
    /// hPa
    pub pressure: f64,
    pub description: String,
    /// m/s
    pub wind_speed: f64,
    /// Degrees, 0-360
    pub wind_direction: i32,
    /// km
    pub visibility: f64,
    pub uv_index: f64,
    /// Apparent temperature in Celsius
    pub feels_like: f64,
    pub updated_at: DateTime<Utc>,
}

/// Input of `getWeather`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetWeatherInput {
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Input of `createWeather`
///
/// Integer fields are accepted as plain JSON numbers and checked for
/// integrality during validation, so a fractional humidity is reported
/// against the field instead of as a generic decoding failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWeatherInput {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub description: String,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub visibility: f64,
    pub uv_index: f64,
    pub feels_like: f64,
}

/// A city lookup after trimming and constraint checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery {
    pub city: String,
    pub country: Option<String>,
}

impl GetWeatherInput {
    pub fn validate(self) -> Result<CityQuery> {
        let city = validate_city(&self.city)?;
        let country = match self.country {
            Some(country) => Some(validate_country(country)?),
            None => None,
        };
        Ok(CityQuery { city, country })
    }
}

impl CreateWeatherInput {
    pub fn validate(self) -> Result<NewWeather> {
        let city = validate_city(&self.city)?;
        let country = validate_country(self.country)?;
        let temperature = to_storage("temperature", self.temperature, NUMERIC_5_2)?;
        let humidity = validate_integer("humidity", self.humidity, 0, 100)?;

        // Checked after rounding so nothing below the column scale becomes 0.00
        let pressure = to_storage("pressure", self.pressure, NUMERIC_7_2)?;
        if pressure <= Decimal::ZERO {
            return Err(AppError::invalid_input("pressure", "must be positive"));
        }

        if self.description.is_empty() {
            return Err(AppError::invalid_input("description", "must not be empty"));
        }

        let wind_speed = non_negative("wind_speed", self.wind_speed)?;
        let wind_direction = validate_integer("wind_direction", self.wind_direction, 0, 360)?;
        let visibility = non_negative("visibility", self.visibility)?;

        if !(0.0..=11.0).contains(&self.uv_index) {
            return Err(AppError::invalid_input(
                "uv_index",
                "must be between 0 and 11",
            ));
        }
        let uv_index = to_storage("uv_index", self.uv_index, NUMERIC_3_1)?;
        let feels_like = to_storage("feels_like", self.feels_like, NUMERIC_5_2)?;

        Ok(NewWeather {
            city,
            country,
            temperature,
            humidity,
            pressure,
            description: self.description,
            wind_speed,
            wind_direction,
            visibility,
            uv_index,
            feels_like,
        })
    }
}

fn validate_city(city: &str) -> Result<String> {
    let trimmed = city.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("city", "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn validate_country(country: String) -> Result<String> {
    if country.chars().count() != 2 {
        return Err(AppError::invalid_input(
            "country",
            format!(
                "'{}' must be exactly 2 characters (e.g., 'GB', 'FR')",
                country
            ),
        ));
    }
    Ok(country)
}

fn validate_integer(field: &'static str, value: f64, min: i32, max: i32) -> Result<i32> {
    if value.fract() != 0.0 || !value.is_finite() {
        return Err(AppError::invalid_input(field, "must be an integer"));
    }
    if value < f64::from(min) || value > f64::from(max) {
        return Err(AppError::invalid_input(
            field,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(value as i32)
}

fn non_negative(field: &'static str, value: f64) -> Result<Decimal> {
    if !(value >= 0.0) {
        return Err(AppError::invalid_input(field, "must not be negative"));
    }
    to_storage(field, value, NUMERIC_5_2)
}
