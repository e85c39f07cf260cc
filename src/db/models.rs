use crate::decimal::from_storage;
use crate::model::Weather;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A row of the `weather` table, numeric columns in their stored form
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct WeatherRow {
    pub id: i32,
    pub city: String,
    pub country: String,
    pub temperature: Decimal,
    pub humidity: i32,
    pub pressure: Decimal,
    pub description: String,
    pub wind_speed: Decimal,
    pub wind_direction: i32,
    pub visibility: Decimal,
    pub uv_index: Decimal,
    pub feels_like: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// A validated observation ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewWeather {
    pub city: String,
    pub country: String,
    pub temperature: Decimal,
    pub humidity: i32,
    pub pressure: Decimal,
    pub description: String,
    pub wind_speed: Decimal,
    pub wind_direction: i32,
    pub visibility: Decimal,
    pub uv_index: Decimal,
    pub feels_like: Decimal,
}

impl From<WeatherRow> for Weather {
    fn from(row: WeatherRow) -> Self {
        Weather {
            id: row.id,
            city: row.city,
            country: row.country,
            temperature: from_storage(row.temperature),
            humidity: row.humidity,
            pressure: from_storage(row.pressure),
            description: row.description,
            wind_speed: from_storage(row.wind_speed),
            wind_direction: row.wind_direction,
            visibility: from_storage(row.visibility),
            uv_index: from_storage(row.uv_index),
            feels_like: from_storage(row.feels_like),
            updated_at: row.updated_at,
        }
    }
}
