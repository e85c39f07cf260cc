use crate::db::models::{NewWeather, WeatherRow};
use crate::db::WeatherStore;
use crate::error::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

const WEATHER_COLUMNS: &str = "id, city, country, temperature, humidity, pressure, description, \
     wind_speed, wind_direction, visibility, uv_index, feels_like, updated_at";

/// PostgreSQL-backed weather store
#[derive(Clone)]
pub struct Repository {
    pool: PgPool,
}

impl Repository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl WeatherStore for Repository {
    async fn insert_weather(&self, weather: NewWeather) -> Result<WeatherRow> {
        let query = format!(
            r#"
            INSERT INTO weather
                (city, country, temperature, humidity, pressure, description,
                 wind_speed, wind_direction, visibility, uv_index, feels_like)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            WEATHER_COLUMNS
        );

        let row = sqlx::query_as::<_, WeatherRow>(&query)
            .bind(&weather.city)
            .bind(&weather.country)
            .bind(weather.temperature)
            .bind(weather.humidity)
            .bind(weather.pressure)
            .bind(&weather.description)
            .bind(weather.wind_speed)
            .bind(weather.wind_direction)
            .bind(weather.visibility)
            .bind(weather.uv_index)
            .bind(weather.feels_like)
            .fetch_one(&self.pool)
            .await?;

        debug!("Inserted weather {} for {}, {}", row.id, row.city, row.country);
        Ok(row)
    }

    async fn all_weather(&self) -> Result<Vec<WeatherRow>> {
        let query = format!("SELECT {} FROM weather", WEATHER_COLUMNS);
        let rows = sqlx::query_as::<_, WeatherRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn latest_weather(
        &self,
        city: &str,
        country: Option<&str>,
    ) -> Result<Option<WeatherRow>> {
        // A NULL country parameter disables the country filter
        let query = format!(
            r#"
            SELECT {}
            FROM weather
            WHERE city = $1 AND ($2::varchar IS NULL OR country = $2)
            ORDER BY updated_at DESC, id DESC
            LIMIT 1
            "#,
            WEATHER_COLUMNS
        );

        let row = sqlx::query_as::<_, WeatherRow>(&query)
            .bind(city)
            .bind(country)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }
}
