use crate::models::round2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Psychrometric constant (kPa/°C)
const PSYCHROMETRIC_CONSTANT: f64 = 0.665e-3;

/// Solar constant (MJ m⁻² min⁻¹)
const SOLAR_CONSTANT: f64 = 0.0820;

/// Reference evapotranspiration model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Et0Method {
    /// Temperature-only Hargreaves equation
    #[default]
    Hargreaves,
    /// FAO-56 Penman-Monteith form with temperature standing in for radiation
    Penman,
}

impl Et0Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Et0Method::Hargreaves => "hargreaves",
            Et0Method::Penman => "penman",
        }
    }
}

impl std::fmt::Display for Et0Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything either model may need for one day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Et0Inputs {
    pub t_max: f64,
    pub t_min: f64,
    pub t_mean: f64,
    pub relative_humidity: f64,
    /// Net radiation or a proxy for it; estimated from the diurnal range when absent
    pub net_radiation: Option<f64>,
    pub wind_speed: f64,
    pub latitude: f64,
    /// 1-366
    pub day_of_year: u32,
}

impl Et0Method {
    /// Evaluate the chosen model. `None` when the model is undefined for the inputs.
    pub fn estimate(&self, inputs: &Et0Inputs) -> Option<f64> {
        match self {
            Et0Method::Hargreaves => hargreaves(
                inputs.t_max,
                inputs.t_min,
                inputs.latitude,
                inputs.day_of_year,
            ),
            Et0Method::Penman => Some(penman(
                inputs.t_max,
                inputs.t_min,
                inputs.t_mean,
                inputs.relative_humidity,
                inputs.net_radiation,
                inputs.wind_speed,
            )),
        }
    }
}

/// Saturation vapour pressure (kPa) at temperature `t` (°C)
pub fn saturation_vapor_pressure(t: f64) -> f64 {
    0.6108 * ((17.27 * t) / (t + 237.3)).exp()
}

/// Penman-Monteith style ET0 (mm/day). Not rounded.
pub fn penman(
    t_max: f64,
    t_min: f64,
    t_mean: f64,
    relative_humidity: f64,
    net_radiation: Option<f64>,
    wind_speed: f64,
) -> f64 {
    let es = (saturation_vapor_pressure(t_max) + saturation_vapor_pressure(t_min)) / 2.0;
    let ea = (relative_humidity / 100.0) * es;
    let delta = (4098.0 * es) / (t_mean + 237.3).powi(2);
    let rn = net_radiation.unwrap_or(0.16 * (t_max - t_min));
    let gamma = PSYCHROMETRIC_CONSTANT;

    let numerator =
        0.408 * delta * rn + gamma * (900.0 / (t_mean + 273.0)) * wind_speed * (es - ea);
    let denominator = delta + gamma * (1.0 + 0.34 * wind_speed);

    numerator / denominator
}

/// Extraterrestrial radiation Ra (MJ m⁻² day⁻¹).
///
/// `None` when the sun never sets or never rises (sunset hour angle undefined).
pub fn extraterrestrial_radiation(latitude: f64, day_of_year: u32) -> Option<f64> {
    let angle = 2.0 * PI * day_of_year as f64 / 365.0;
    let dr = 1.0 + 0.033 * angle.cos();
    let declination = 0.409 * (angle - 1.39).sin();
    let phi = latitude.to_radians();

    let ws_arg = -phi.tan() * declination.tan();
    if !(-1.0..=1.0).contains(&ws_arg) {
        return None;
    }
    let ws = ws_arg.acos();

    let ra = (24.0 * 60.0 / PI)
        * SOLAR_CONSTANT
        * dr
        * (ws * phi.sin() * declination.sin() + phi.cos() * declination.cos() * ws.sin());
    Some(ra)
}

/// Hargreaves ET0 (mm/day), rounded to two decimals.
///
/// `None` when `t_max < t_min` or at polar day/night.
pub fn hargreaves(t_max: f64, t_min: f64, latitude: f64, day_of_year: u32) -> Option<f64> {
    if t_max < t_min {
        return None;
    }
    let ra = extraterrestrial_radiation(latitude, day_of_year)?;
    let t_mean = (t_max + t_min) / 2.0;
    let et0 = 0.0023 * (t_mean + 17.8) * (t_max - t_min).sqrt() * ra;
    Some(round2(et0))
}
