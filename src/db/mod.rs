pub mod memory;
pub mod models;
pub mod repository;

pub use memory::MemoryStore;
pub use repository::Repository;

use crate::error::Result;
use async_trait::async_trait;
use models::{NewWeather, WeatherRow};

/// Storage of weather observations
///
/// Every method is a single atomic read or insert; implementations must not
/// hold state across calls beyond the rows themselves.
#[async_trait]
pub trait WeatherStore: Send + Sync {
    /// Insert one observation, stamping it with a fresh id and the current time.
    async fn insert_weather(&self, weather: NewWeather) -> Result<WeatherRow>;

    /// All observations in storage order.
    async fn all_weather(&self) -> Result<Vec<WeatherRow>>;

    /// The most recent observation for an exact city (and country) match.
    ///
    /// Equal timestamps resolve to the highest id.
    async fn latest_weather(&self, city: &str, country: Option<&str>)
        -> Result<Option<WeatherRow>>;
}
