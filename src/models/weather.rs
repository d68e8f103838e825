use crate::error::{AgroError, Result};
use chrono::NaiveDate;

/// A point on the globe, validated on construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AgroError::InvalidLocation(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AgroError::InvalidLocation(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}

/// One forecast day as reported by the provider. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyWeather {
    /// Provider's own date for the day; informational only
    pub date: Option<NaiveDate>,
    pub t_max: Option<f64>,
    pub t_min: Option<f64>,
    /// Mean temperature, also used as the radiation proxy
    pub t_mean: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

impl DailyWeather {
    /// Both temperature extremes, if present
    pub fn temperatures(&self) -> Option<(f64, f64)> {
        Some((self.t_max?, self.t_min?))
    }

    /// All fields the ET0 report needs
    pub fn complete(&self) -> Option<CompleteDay> {
        Some(CompleteDay {
            t_max: self.t_max?,
            t_min: self.t_min?,
            relative_humidity: self.relative_humidity?,
            radiation_proxy: self.t_mean?,
            wind_speed: self.wind_speed?,
        })
    }
}

/// A day with every ET0 input present
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompleteDay {
    pub t_max: f64,
    pub t_min: f64,
    pub relative_humidity: f64,
    pub radiation_proxy: f64,
    pub wind_speed: f64,
}

/// Aligned daily forecast, earliest day first, index 0 is "today"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyWeatherSeries {
    pub days: Vec<DailyWeather>,
}

impl DailyWeatherSeries {
    pub fn new(days: Vec<DailyWeather>) -> Self {
        Self { days }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Max/min temperature pairs with gaps preserved
    pub fn temperature_pairs(&self) -> Vec<Option<(f64, f64)>> {
        self.days.iter().map(DailyWeather::temperatures).collect()
    }
}
