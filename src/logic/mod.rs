pub mod degree_days;
pub mod evapotranspiration;
pub mod export;
pub mod forecast_service;
pub mod heat_stress;
pub mod report;

pub use forecast_service::ForecastService;
