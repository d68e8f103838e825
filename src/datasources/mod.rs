pub mod meteoblue;

pub use meteoblue::MeteoblueClient;

use crate::error::Result;
use crate::models::{DailyWeatherSeries, Location};

/// Provider of aligned daily forecast arrays, index 0 being today
#[allow(async_fn_in_trait)]
pub trait WeatherSource {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Fetch the daily forecast for a location. One attempt, bounded wait.
    async fn fetch_daily(&self, location: &Location) -> Result<DailyWeatherSeries>;
}
