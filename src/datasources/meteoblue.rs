use super::WeatherSource;
use crate::config::MeteoblueConfig;
use crate::error::{AgroError, Result};
use crate::models::{DailyWeather, DailyWeatherSeries, Location};
use chrono::NaiveDate;
use serde::Deserialize;

pub struct MeteoblueClient {
    client: reqwest::Client,
    config: MeteoblueConfig,
    default_wind_speed_ms: Option<f64>,
}

// Meteoblue basic-day response structures
#[derive(Debug, Deserialize)]
struct MbResponse {
    #[serde(default)]
    data_day: Option<MbDataDay>,
}

#[derive(Debug, Default, Deserialize)]
struct MbDataDay {
    #[serde(default)]
    time: Vec<Option<String>>,
    #[serde(default)]
    temperature_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_min: Vec<Option<f64>>,
    #[serde(default)]
    temperature_mean: Vec<Option<f64>>,
    #[serde(default)]
    relativehumidity_mean: Vec<Option<f64>>,
    #[serde(default)]
    windspeed_mean: Option<Vec<Option<f64>>>,
}

impl MeteoblueClient {
    pub fn new(config: MeteoblueConfig, default_wind_speed_ms: Option<f64>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            config,
            default_wind_speed_ms,
        })
    }

    fn forecast_url(&self, location: &Location) -> String {
        format!(
            "{}/{}?apikey={}&lat={}&lon={}&asl={}&format=json",
            self.config.base_url.trim_end_matches('/'),
            self.config.package,
            self.config.api_key,
            location.latitude,
            location.longitude,
            self.config.elevation_m
        )
    }

    /// Test connection to the Meteoblue API
    pub async fn test_connection(&self) -> Result<bool> {
        let location = Location::new(0.0, 0.0)?;
        let response = self
            .client
            .get(self.forecast_url(&location))
            .send()
            .await
            .map_err(|e| {
                AgroError::DataSourceUnavailable(format!("Meteoblue: {}", e.without_url()))
            })?;

        Ok(response.status().is_success())
    }

    fn parse_body(&self, body: &str) -> Result<DailyWeatherSeries> {
        let response: MbResponse = serde_json::from_str(body).map_err(|e| {
            AgroError::MalformedResponse(format!("Failed to parse Meteoblue response: {}", e))
        })?;

        let data_day = response.data_day.ok_or_else(|| {
            AgroError::MalformedResponse("Meteoblue response has no data_day".into())
        })?;

        Ok(self.convert_data_day(data_day))
    }

    /// Days are aligned on the temperature extremes; shorter auxiliary
    /// arrays leave trailing days incomplete.
    fn convert_data_day(&self, data: MbDataDay) -> DailyWeatherSeries {
        let len = data.temperature_max.len().min(data.temperature_min.len());

        let wind = match data.windspeed_mean {
            Some(wind) => wind,
            None => {
                if let Some(default) = self.default_wind_speed_ms {
                    tracing::warn!(default, "Meteoblue returned no wind data, using default");
                }
                vec![self.default_wind_speed_ms; len]
            }
        };

        let at = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

        let days = (0..len)
            .map(|i| DailyWeather {
                date: data
                    .time
                    .get(i)
                    .and_then(|t| t.as_deref())
                    .and_then(|t| NaiveDate::parse_from_str(t, "%Y-%m-%d").ok()),
                t_max: at(&data.temperature_max, i),
                t_min: at(&data.temperature_min, i),
                t_mean: at(&data.temperature_mean, i),
                relative_humidity: at(&data.relativehumidity_mean, i),
                wind_speed: at(&wind, i),
            })
            .collect();

        DailyWeatherSeries::new(days)
    }
}

impl WeatherSource for MeteoblueClient {
    fn name(&self) -> &'static str {
        "Meteoblue"
    }

    async fn fetch_daily(&self, location: &Location) -> Result<DailyWeatherSeries> {
        tracing::debug!(%location, package = %self.config.package, "Requesting Meteoblue forecast");

        let response = self
            .client
            .get(self.forecast_url(location))
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() { "timed out" } else { "request failed" };
                AgroError::DataSourceUnavailable(format!(
                    "Meteoblue {}: {}",
                    reason,
                    e.without_url()
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgroError::DataSourceUnavailable(format!(
                "Meteoblue returned {}: {}",
                status, body
            )));
        }

        let body = response.text().await.map_err(|e| {
            AgroError::DataSourceUnavailable(format!("Meteoblue: {}", e.without_url()))
        })?;
        tracing::debug!(bytes = body.len(), "Received Meteoblue payload");

        let series = self.parse_body(&body)?;
        tracing::debug!(days = series.len(), "Parsed Meteoblue daily forecast");
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> MeteoblueConfig {
        MeteoblueConfig {
            api_key: "test_key".to_string(),
            ..MeteoblueConfig::default()
        }
    }

    fn client(default_wind: Option<f64>) -> MeteoblueClient {
        MeteoblueClient::new(sample_config(), default_wind).unwrap()
    }

    const SAMPLE: &str = r#"{
        "metadata": {"name": "", "latitude": 40.42, "longitude": -3.7, "height": 100},
        "units": {"temperature": "C", "windspeed": "ms-1"},
        "data_day": {
            "time": ["2026-07-01", "2026-07-02", "2026-07-03"],
            "temperature_max": [31.2, 33.0, null],
            "temperature_min": [17.1, 18.4, 19.0],
            "temperature_mean": [24.0, 25.5, 26.1],
            "relativehumidity_mean": [41, 38, 44],
            "windspeed_mean": [2.4, null, 3.1]
        }
    }"#;

    #[test]
    fn url_carries_location_and_elevation() {
        let url = client(None).forecast_url(&Location::new(40.42, -3.7).unwrap());
        assert_eq!(
            url,
            "https://my.meteoblue.com/packages/basic-day?apikey=test_key&lat=40.42&lon=-3.7&asl=100&format=json"
        );
    }

    #[test]
    fn parses_daily_arrays_with_nulls() {
        let series = client(Some(2.0)).parse_body(SAMPLE).unwrap();
        assert_eq!(series.len(), 3);

        let first = &series.days[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2026, 7, 1));
        assert_eq!(first.t_max, Some(31.2));
        assert_eq!(first.relative_humidity, Some(41.0));
        assert!(first.complete().is_some());

        // Null entries stay missing; the default only covers an absent array
        assert_eq!(series.days[1].wind_speed, None);
        assert_eq!(series.days[2].t_max, None);
    }

    #[test]
    fn missing_data_day_is_malformed() {
        let err = client(None)
            .parse_body(r#"{"metadata": {}}"#)
            .unwrap_err();
        assert!(matches!(err, AgroError::MalformedResponse(_)));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = client(None).parse_body("<html>busy</html>").unwrap_err();
        assert!(matches!(err, AgroError::MalformedResponse(_)));
    }

    #[test]
    fn absent_wind_array_uses_default() {
        let body = r#"{"data_day": {
            "temperature_max": [30.0, 31.0],
            "temperature_min": [15.0, 16.0],
            "temperature_mean": [22.0, 23.0],
            "relativehumidity_mean": [50, 55]
        }}"#;
        let series = client(Some(2.0)).parse_body(body).unwrap();
        assert!(series.days.iter().all(|d| d.wind_speed == Some(2.0)));

        let series = client(None).parse_body(body).unwrap();
        assert!(series.days.iter().all(|d| d.wind_speed.is_none()));
    }

    #[test]
    fn alignment_follows_shortest_temperature_array() {
        let body = r#"{"data_day": {
            "temperature_max": [30.0, 31.0, 32.0],
            "temperature_min": [15.0, 16.0],
            "temperature_mean": [22.0],
            "relativehumidity_mean": [50, 55, 60],
            "windspeed_mean": [2.0, 2.0, 2.0]
        }}"#;
        let series = client(None).parse_body(body).unwrap();
        assert_eq!(series.len(), 2);
        assert!(series.days[0].complete().is_some());
        assert!(series.days[1].complete().is_none());
        assert_eq!(series.days[1].temperatures(), Some((31.0, 16.0)));
    }

    #[tokio::test]
    async fn connection_errors_do_not_leak_api_key() {
        let config = MeteoblueConfig {
            api_key: "SUPERSECRETKEY".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..MeteoblueConfig::default()
        };
        let client = MeteoblueClient::new(config, None).unwrap();
        let location = Location::new(0.0, 0.0).unwrap();

        let err = client.test_connection().await.unwrap_err();
        assert!(matches!(err, AgroError::DataSourceUnavailable(_)));
        assert!(!err.to_string().contains("SUPERSECRETKEY"));

        let err = client.fetch_daily(&location).await.unwrap_err();
        assert!(!err.to_string().contains("SUPERSECRETKEY"));
    }

    #[test]
    fn empty_data_day_yields_empty_series() {
        let series = client(None).parse_body(r#"{"data_day": {}}"#).unwrap();
        assert!(series.is_empty());
    }
}
