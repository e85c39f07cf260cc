//! The weather operations, as functions of their input and an explicit store.

use crate::db::WeatherStore;
use crate::error::{AppError, Result};
use crate::model::{CreateWeatherInput, GetWeatherInput, Weather};
use tracing::{debug, error};

/// Validate and persist one observation, returning it as stored.
pub async fn create_weather(
    store: &dyn WeatherStore,
    input: CreateWeatherInput,
) -> Result<Weather> {
    let new_weather = input.validate()?;

    let row = store.insert_weather(new_weather).await.map_err(|e| {
        error!("Weather creation failed: {}", e);
        e
    })?;

    debug!("Created weather {} for {}, {}", row.id, row.city, row.country);
    Ok(row.into())
}

/// Every stored observation, in storage order.
pub async fn get_all_weather(store: &dyn WeatherStore) -> Result<Vec<Weather>> {
    let rows = store.all_weather().await.map_err(|e| {
        error!("Failed to fetch weather data: {}", e);
        e
    })?;

    Ok(rows.into_iter().map(Weather::from).collect())
}

/// The most recent observation for a city, optionally narrowed to one country.
pub async fn get_weather(store: &dyn WeatherStore, input: GetWeatherInput) -> Result<Weather> {
    let query = input.validate()?;

    let row = store
        .latest_weather(&query.city, query.country.as_deref())
        .await
        .map_err(|e| {
            error!("Get weather failed: {}", e);
            e
        })?;

    match row {
        Some(row) => Ok(row.into()),
        None => Err(AppError::NotFound(match &query.country {
            Some(country) => format!(
                "Weather data not found for city: {}, {}",
                query.city, country
            ),
            None => format!("Weather data not found for city: {}", query.city),
        })),
    }
}
