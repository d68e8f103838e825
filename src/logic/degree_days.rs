use crate::models::GddSeries;

/// Growing degree-day accumulation over daily max/min temperatures
#[derive(Debug, Clone, Copy)]
pub struct DegreeDayAccumulator {
    base_temp_c: f64,
    alert_threshold: f64,
}

impl DegreeDayAccumulator {
    pub fn new(base_temp_c: f64, alert_threshold: f64) -> Self {
        Self {
            base_temp_c,
            alert_threshold,
        }
    }

    /// GDD for a day with mean temperature `t_mean`
    pub fn gdd_for_mean(&self, t_mean: f64) -> f64 {
        (t_mean - self.base_temp_c).max(0.0)
    }

    /// Per-day values with gaps plus the running total over valid days
    pub fn accumulate(&self, days: &[Option<(f64, f64)>]) -> GddSeries {
        let daily: Vec<Option<f64>> = days
            .iter()
            .map(|day| day.map(|(t_max, t_min)| self.gdd_for_mean((t_max + t_min) / 2.0)))
            .collect();

        let accumulated = daily.iter().flatten().sum();

        GddSeries {
            daily,
            accumulated,
        }
    }

    /// True when any single day reaches the alert threshold
    pub fn single_day_alert(&self, series: &GddSeries) -> bool {
        series
            .daily
            .iter()
            .flatten()
            .any(|gdd| *gdd >= self.alert_threshold)
    }
}

impl Default for DegreeDayAccumulator {
    fn default() -> Self {
        Self::new(13.0, 18.0)
    }
}
