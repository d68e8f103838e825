use super::degree_days::DegreeDayAccumulator;
use super::evapotranspiration::Et0Method;
use super::heat_stress::HeatStressDetector;
use super::report::{build_degree_day_report, ForecastReportBuilder};
use crate::config::AgronomyConfig;
use crate::datasources::WeatherSource;
use crate::error::{AgroError, Result};
use crate::models::{
    DailyWeatherSeries, DayRecord, DegreeDayReport, DegreeDaySummary, Location,
};
use chrono::NaiveDate;

/// Request orchestration: one fetch, one computation pass, one response.
///
/// Callers capture the evaluation date once per request and pass it in.
pub struct ForecastService<S> {
    source: S,
    agronomy: AgronomyConfig,
}

impl<S: WeatherSource> ForecastService<S> {
    pub fn new(source: S, agronomy: AgronomyConfig) -> Self {
        Self { source, agronomy }
    }

    fn accumulator(&self) -> DegreeDayAccumulator {
        DegreeDayAccumulator::new(
            self.agronomy.gdd_base_temp_c,
            self.agronomy.gdd_alert_threshold,
        )
    }

    fn detector(&self) -> HeatStressDetector {
        HeatStressDetector::new(
            self.agronomy.gdd_alert_threshold,
            self.agronomy.heat_stress_consecutive_days,
        )
    }

    async fn fetch(&self, location: &Location) -> Result<DailyWeatherSeries> {
        let series = self.source.fetch_daily(location).await.map_err(|e| {
            tracing::error!(source = self.source.name(), %location, "Forecast fetch failed: {}", e);
            e
        })?;

        if series.is_empty() {
            tracing::error!(source = self.source.name(), %location, "Forecast has no aligned days");
            return Err(AgroError::InsufficientData(format!(
                "{} returned no daily data",
                self.source.name()
            )));
        }

        tracing::info!(source = self.source.name(), days = series.len(), "Forecast fetched");
        Ok(series)
    }

    /// Day-by-day ET0 table, clamped to the configured horizon
    pub async fn forecast_report(
        &self,
        location: &Location,
        method: Option<Et0Method>,
        evaluated_on: NaiveDate,
    ) -> Result<Vec<DayRecord>> {
        let series = self.fetch(location).await?;
        let method = method.unwrap_or(self.agronomy.et0_method);
        let builder = ForecastReportBuilder::new(method, self.agronomy.max_report_days);

        let records = builder.build(&series, location, evaluated_on);
        if records.is_empty() {
            tracing::error!(%location, %method, "No usable forecast days");
            return Err(AgroError::InsufficientData(
                "no forecast day had complete data".into(),
            ));
        }

        Ok(records)
    }

    pub async fn degree_day_report(
        &self,
        location: &Location,
        evaluated_on: NaiveDate,
    ) -> Result<DegreeDayReport> {
        let series = self.fetch(location).await?;
        let report =
            build_degree_day_report(&series, &self.accumulator(), &self.detector(), evaluated_on);

        if report.rows.is_empty() {
            tracing::error!(%location, "No forecast day had both temperature extremes");
            return Err(AgroError::InsufficientData(
                "no forecast day had max and min temperature".into(),
            ));
        }

        Ok(report)
    }

    /// Single-day alert and accumulated total only
    pub async fn degree_day_summary(&self, location: &Location) -> Result<DegreeDaySummary> {
        let series = self.fetch(location).await?;
        let accumulator = self.accumulator();
        let gdd = accumulator.accumulate(&series.temperature_pairs());

        if gdd.valid_days() == 0 {
            tracing::error!(%location, "No forecast day had both temperature extremes");
            return Err(AgroError::InsufficientData(
                "no forecast day had max and min temperature".into(),
            ));
        }

        Ok(DegreeDaySummary {
            alert: accumulator.single_day_alert(&gdd),
            accumulated_gdd: crate::models::round2(gdd.accumulated),
        })
    }
}
