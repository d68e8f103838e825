use super::degree_days::DegreeDayAccumulator;
use super::evapotranspiration::{Et0Inputs, Et0Method};
use super::heat_stress::HeatStressDetector;
use crate::models::{
    round2, ChartPoint, DailyWeatherSeries, DayRecord, DegreeDayReport, DegreeDayRow, Location,
};
use chrono::{Datelike, Days, NaiveDate};

/// Turns a daily forecast into ET0 report rows
#[derive(Debug, Clone, Copy)]
pub struct ForecastReportBuilder {
    method: Et0Method,
    max_days: usize,
}

impl ForecastReportBuilder {
    pub fn new(method: Et0Method, max_days: usize) -> Self {
        Self { method, max_days }
    }

    /// Day `i` of the forecast is dated `evaluated_on + i`. Incomplete days and
    /// days the model cannot evaluate are left out.
    pub fn build(
        &self,
        series: &DailyWeatherSeries,
        location: &Location,
        evaluated_on: NaiveDate,
    ) -> Vec<DayRecord> {
        let horizon = series.len().min(self.max_days);
        let mut records = Vec::with_capacity(horizon);

        for (i, day) in series.days.iter().take(horizon).enumerate() {
            let Some(date) = offset_date(evaluated_on, i) else {
                break;
            };

            let Some(values) = day.complete() else {
                tracing::warn!(%date, "Incomplete forecast data, skipping day");
                continue;
            };

            let inputs = Et0Inputs {
                t_max: values.t_max,
                t_min: values.t_min,
                t_mean: values.radiation_proxy,
                relative_humidity: values.relative_humidity,
                net_radiation: Some(values.radiation_proxy),
                wind_speed: values.wind_speed,
                latitude: location.latitude,
                day_of_year: date.ordinal(),
            };

            let Some(et0) = self.method.estimate(&inputs) else {
                tracing::warn!(
                    %date,
                    method = %self.method,
                    t_max = values.t_max,
                    t_min = values.t_min,
                    "ET0 undefined for day, skipping"
                );
                continue;
            };

            records.push(DayRecord {
                date,
                t_max: round2(values.t_max),
                t_min: round2(values.t_min),
                humidity: round2(values.relative_humidity),
                radiation: round2(values.radiation_proxy),
                wind: round2(values.wind_speed),
                et0: round2(et0),
            });
        }

        records
    }
}

/// Degree-day table, alerts and chart series over the full forecast horizon
pub fn build_degree_day_report(
    series: &DailyWeatherSeries,
    accumulator: &DegreeDayAccumulator,
    detector: &HeatStressDetector,
    evaluated_on: NaiveDate,
) -> DegreeDayReport {
    let pairs = series.temperature_pairs();
    let gdd = accumulator.accumulate(&pairs);
    let predictive = detector.scan(&gdd.daily);

    let mut rows = Vec::new();
    let mut chart = Vec::with_capacity(pairs.len());

    // The scan keeps the full gap-preserving series, which is what gets charted
    for (i, (pair, value)) in pairs.iter().zip(&predictive.series).enumerate() {
        let Some(date) = offset_date(evaluated_on, i) else {
            break;
        };
        chart.push(ChartPoint {
            date,
            gdd: value.map(round2),
        });
        if let (Some((t_max, t_min)), Some(value)) = (pair, value) {
            rows.push(DegreeDayRow {
                date,
                mean_temp: round2((t_max + t_min) / 2.0),
                gdd: round2(*value),
            });
        }
    }

    let predictive_trigger_date = predictive
        .trigger_index
        .and_then(|i| offset_date(evaluated_on, i));

    DegreeDayReport {
        rows,
        accumulated_gdd: round2(gdd.accumulated),
        alert: accumulator.single_day_alert(&gdd),
        predictive_alert: predictive.triggered,
        predictive_trigger_date,
        chart,
    }
}

fn offset_date(start: NaiveDate, offset: usize) -> Option<NaiveDate> {
    start.checked_add_days(Days::new(offset as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyWeather;

    fn day(t_max: f64, t_min: f64) -> DailyWeather {
        DailyWeather {
            date: None,
            t_max: Some(t_max),
            t_min: Some(t_min),
            t_mean: Some((t_max + t_min) / 2.0),
            relative_humidity: Some(60.0),
            wind_speed: Some(2.0),
        }
    }

    fn location() -> Location {
        Location::new(40.0, -3.7).unwrap()
    }

    fn eval_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 29).unwrap()
    }

    #[test]
    fn clamps_to_max_days() {
        let series = DailyWeatherSeries::new((0..20).map(|_| day(30.0, 15.0)).collect());
        let builder = ForecastReportBuilder::new(Et0Method::Hargreaves, 14);
        let records = builder.build(&series, &location(), eval_date());
        assert_eq!(records.len(), 14);
        assert_eq!(records[13].date, NaiveDate::from_ymd_opt(2026, 7, 12).unwrap());
    }

    #[test]
    fn skips_incomplete_days_and_keeps_order() {
        let mut days: Vec<DailyWeather> = (0..5).map(|i| day(30.0 + i as f64, 15.0)).collect();
        days[2].wind_speed = None;
        let series = DailyWeatherSeries::new(days);

        let builder = ForecastReportBuilder::new(Et0Method::Hargreaves, 14);
        let records = builder.build(&series, &location(), eval_date());

        assert_eq!(records.len(), 4);
        let dates: Vec<String> = records
            .iter()
            .map(|r| r.date.format("%d-%m-%Y").to_string())
            .collect();
        assert_eq!(
            dates,
            vec!["29-06-2026", "30-06-2026", "02-07-2026", "03-07-2026"]
        );
        assert_eq!(records[2].t_max, 33.0);
    }

    #[test]
    fn hargreaves_uses_evaluation_day_of_year() {
        // 2026-06-29 is day 180
        let series = DailyWeatherSeries::new(vec![day(30.0, 15.0)]);
        let builder = ForecastReportBuilder::new(Et0Method::Hargreaves, 14);
        let records = builder.build(&series, &location(), eval_date());
        assert_eq!(records[0].et0, 14.98);
    }

    #[test]
    fn penman_uses_mean_temperature_as_radiation_proxy() {
        let series = DailyWeatherSeries::new(vec![day(30.0, 15.0)]);
        let builder = ForecastReportBuilder::new(Et0Method::Penman, 14);
        let records = builder.build(&series, &location(), eval_date());
        assert_eq!(records[0].radiation, 22.5);
        assert_eq!(records[0].et0, 9.15);
    }

    #[test]
    fn undefined_et0_days_are_skipped() {
        let series = DailyWeatherSeries::new(vec![day(10.0, 12.0), day(30.0, 15.0)]);
        let builder = ForecastReportBuilder::new(Et0Method::Hargreaves, 14);
        let records = builder.build(&series, &location(), eval_date());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2026, 6, 30).unwrap());
    }

    #[test]
    fn values_are_rounded() {
        let mut d = day(30.456, 15.123);
        d.relative_humidity = Some(61.239);
        d.wind_speed = Some(2.005_1);
        let series = DailyWeatherSeries::new(vec![d]);
        let builder = ForecastReportBuilder::new(Et0Method::Penman, 14);
        let record = &builder.build(&series, &location(), eval_date())[0];
        assert_eq!(record.t_max, 30.46);
        assert_eq!(record.t_min, 15.12);
        assert_eq!(record.humidity, 61.24);
        assert_eq!(record.wind, 2.01);
        assert_eq!(record.et0, round2(record.et0));
    }

    #[test]
    fn degree_day_report_over_full_horizon() {
        let mut days = vec![
            day(40.0, 22.0), // 18
            day(41.0, 23.0), // 19
            day(20.0, 10.0), // 2
            day(42.0, 24.0), // 20
            day(42.0, 24.0), // 20
            day(42.0, 24.0), // 20
            day(20.0, 14.0), // 4
        ];
        days.push(DailyWeather::default());
        let series = DailyWeatherSeries::new(days);

        let report = build_degree_day_report(
            &series,
            &DegreeDayAccumulator::default(),
            &HeatStressDetector::default(),
            eval_date(),
        );

        assert_eq!(report.rows.len(), 7);
        assert_eq!(report.chart.len(), 8);
        assert_eq!(report.chart[7].gdd, None);
        assert_eq!(report.chart[2].gdd, Some(2.0));
        assert_eq!(report.chart[6].date, NaiveDate::from_ymd_opt(2026, 7, 5).unwrap());
        assert_eq!(report.accumulated_gdd, 103.0);
        assert!(report.alert);
        assert!(report.predictive_alert);
        assert_eq!(
            report.predictive_trigger_date,
            Some(NaiveDate::from_ymd_opt(2026, 7, 4).unwrap())
        );
        assert_eq!(report.rows[0].mean_temp, 31.0);
        assert_eq!(report.rows[0].date, eval_date());
    }

    #[test]
    fn degree_day_rows_skip_missing_temperatures() {
        let mut gap = day(40.0, 22.0);
        gap.t_min = None;
        let series = DailyWeatherSeries::new(vec![day(40.0, 22.0), day(40.0, 22.0), gap, day(40.0, 22.0)]);

        let report = build_degree_day_report(
            &series,
            &DegreeDayAccumulator::default(),
            &HeatStressDetector::default(),
            eval_date(),
        );

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[2].date, NaiveDate::from_ymd_opt(2026, 7, 2).unwrap());
        assert_eq!(report.accumulated_gdd, 54.0);
        assert!(report.alert);
        assert!(!report.predictive_alert);
        assert_eq!(report.predictive_trigger_date, None);
    }
}
