use crate::db::models::{NewWeather, WeatherRow};
use crate::db::WeatherStore;
use crate::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Weather store held in process memory
///
/// Used when no database is configured, and by tests. Column range checks
/// happen during input validation, so it accepts exactly what PostgreSQL does.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Arc<RwLock<Vec<WeatherRow>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing rows, keeping their ids and timestamps
    pub fn from_rows(rows: Vec<WeatherRow>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }
}

#[async_trait]
impl WeatherStore for MemoryStore {
    async fn insert_weather(&self, weather: NewWeather) -> Result<WeatherRow> {
        let mut rows = self.rows.write().await;
        let id = rows.iter().map(|row| row.id).max().unwrap_or(0) + 1;

        let row = WeatherRow {
            id,
            city: weather.city,
            country: weather.country,
            temperature: weather.temperature,
            humidity: weather.humidity,
            pressure: weather.pressure,
            description: weather.description,
            wind_speed: weather.wind_speed,
            wind_direction: weather.wind_direction,
            visibility: weather.visibility,
            uv_index: weather.uv_index,
            feels_like: weather.feels_like,
            updated_at: Utc::now(),
        };
        rows.push(row.clone());

        Ok(row)
    }

    async fn all_weather(&self) -> Result<Vec<WeatherRow>> {
        Ok(self.rows.read().await.clone())
    }

    async fn latest_weather(
        &self,
        city: &str,
        country: Option<&str>,
    ) -> Result<Option<WeatherRow>> {
        let rows = self.rows.read().await;
        let latest = rows
            .iter()
            .filter(|row| row.city == city && country.map_or(true, |c| row.country == c))
            .max_by_key(|row| (row.updated_at, row.id))
            .cloned();

        Ok(latest)
    }
}
