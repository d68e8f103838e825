use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Round to two decimals for display
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One row of the forecast report. Values are already rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    #[serde(with = "day_first_date")]
    pub date: NaiveDate,
    pub t_max: f64,
    pub t_min: f64,
    pub humidity: f64,
    pub radiation: f64,
    pub wind: f64,
    pub et0: f64,
}

/// DD-MM-YYYY on the wire
mod day_first_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%d-%m-%Y";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Per-day growing degree-days with gaps for days lacking temperatures
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GddSeries {
    pub daily: Vec<Option<f64>>,
    pub accumulated: f64,
}

impl GddSeries {
    pub fn valid_days(&self) -> usize {
        self.daily.iter().flatten().count()
    }
}

/// Outcome of a consecutive-day heat-stress scan
#[derive(Debug, Clone, PartialEq)]
pub struct HeatStressAlert {
    pub triggered: bool,
    /// Index of the day that completed the qualifying run
    pub trigger_index: Option<usize>,
    /// Longest run of qualifying days seen anywhere in the series
    pub longest_run: usize,
    /// Full-horizon series the scan ran over, gaps preserved
    pub series: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeDayRow {
    pub date: NaiveDate,
    pub mean_temp: f64,
    pub gdd: f64,
}

/// Chart point; `gdd` is `None` where the day had no usable temperatures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub gdd: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeDayReport {
    pub rows: Vec<DegreeDayRow>,
    pub accumulated_gdd: f64,
    /// Any single day at or above the alert threshold
    pub alert: bool,
    /// A run of consecutive days at or above the threshold
    pub predictive_alert: bool,
    pub predictive_trigger_date: Option<NaiveDate>,
    pub chart: Vec<ChartPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegreeDaySummary {
    pub alert: bool,
    pub accumulated_gdd: f64,
}
