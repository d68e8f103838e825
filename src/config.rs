use crate::error::{AgroError, Result};
use crate::logic::evapotranspiration::Et0Method;
use dialoguer::{Input, Password, Select};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const API_KEY_ENV: &str = "METEOBLUE_API_KEY";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub meteoblue: MeteoblueConfig,
    #[serde(default)]
    pub agronomy: AgronomyConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct MeteoblueConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_package")]
    pub package: String,
    /// Elevation (m above sea level) sent with every request.
    #[serde(default = "default_elevation")]
    pub elevation_m: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://my.meteoblue.com/packages".into()
}

fn default_package() -> String {
    "basic-day".into()
}

fn default_elevation() -> f64 {
    100.0
}

fn default_timeout_secs() -> u64 {
    10
}

impl MeteoblueConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for MeteoblueConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            package: default_package(),
            elevation_m: default_elevation(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for MeteoblueConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeteoblueConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("package", &self.package)
            .field("elevation_m", &self.elevation_m)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Agronomic thresholds and model choices
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AgronomyConfig {
    pub et0_method: Et0Method,
    pub gdd_base_temp_c: f64,
    pub gdd_alert_threshold: f64,
    pub heat_stress_consecutive_days: usize,
    pub max_report_days: usize,
    /// Substituted only when the provider omits the wind array entirely.
    pub default_wind_speed_ms: Option<f64>,
}

impl Default for AgronomyConfig {
    fn default() -> Self {
        Self {
            et0_method: Et0Method::Hargreaves,
            gdd_base_temp_c: 13.0,
            gdd_alert_threshold: 18.0,
            heat_stress_consecutive_days: 3,
            max_report_days: 14,
            default_wind_speed_ms: Some(2.0),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("exports"),
        }
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        let mut config = if config_path.exists() {
            let config_str = std::fs::read_to_string(&config_path)
                .map_err(|e| AgroError::Config(format!("Failed to read config: {}", e)))?;
            Self::parse(&config_str)?
        } else {
            tracing::debug!("No config file at {:?}, using defaults", config_path);
            Config::default()
        };

        // Environment wins over an empty key in the file
        if config.meteoblue.api_key.is_empty() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                config.meteoblue.api_key = key;
            }
        }

        Ok(config)
    }

    /// Parse YAML content after `${VAR}` substitution.
    pub fn parse(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content);
        serde_yaml::from_str(&content)
            .map_err(|e| AgroError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Checks needed before talking to the weather provider
    pub fn validate(&self) -> Result<()> {
        if self.meteoblue.api_key.is_empty() || self.meteoblue.api_key.starts_with("${") {
            return Err(AgroError::Config(format!(
                "Meteoblue API key missing - set {} or run `agroforecast init`",
                API_KEY_ENV
            )));
        }
        if self.meteoblue.timeout_secs == 0 {
            return Err(AgroError::Config("timeout_secs must be positive".into()));
        }
        if self.agronomy.heat_stress_consecutive_days == 0 {
            return Err(AgroError::Config(
                "heat_stress_consecutive_days must be at least 1".into(),
            ));
        }
        if self.agronomy.max_report_days == 0 {
            return Err(AgroError::Config("max_report_days must be at least 1".into()));
        }
        Ok(())
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        Self::default_config_path()
    }

    /// Default path for writing new config files (~/.config/agroforecast/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgroError::Config("Cannot determine config directory".into()))?
            .join("agroforecast");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up agroforecast!");
        println!();

        println!("Meteoblue");
        let api_key: String = Password::new()
            .with_prompt(format!("  API key (blank to read ${} at runtime)", API_KEY_ENV))
            .allow_empty_password(true)
            .interact()
            .map_err(|e| AgroError::Config(format!("Input error: {}", e)))?;

        let elevation_m: f64 = Input::new()
            .with_prompt("  Elevation (m)")
            .default(default_elevation())
            .interact_text()
            .map_err(|e| AgroError::Config(format!("Input error: {}", e)))?;

        println!();
        println!("Agronomy");
        let methods = [Et0Method::Hargreaves, Et0Method::Penman];
        let method_index = Select::new()
            .with_prompt("  ET0 method")
            .items(&methods.iter().map(|m| m.as_str()).collect::<Vec<_>>())
            .default(0)
            .interact()
            .map_err(|e| AgroError::Config(format!("Input error: {}", e)))?;

        let gdd_base_temp_c: f64 = Input::new()
            .with_prompt("  GDD base temperature (°C)")
            .default(13.0)
            .interact_text()
            .map_err(|e| AgroError::Config(format!("Input error: {}", e)))?;

        println!();

        let config = Config {
            meteoblue: MeteoblueConfig {
                // Never persist a literal key when the environment should supply it
                api_key: if api_key.is_empty() {
                    format!("${{{}}}", API_KEY_ENV)
                } else {
                    api_key
                },
                elevation_m,
                ..MeteoblueConfig::default()
            },
            agronomy: AgronomyConfig {
                et0_method: methods[method_index],
                gdd_base_temp_c,
                ..AgronomyConfig::default()
            },
            export: ExportConfig::default(),
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| AgroError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# agroforecast configuration\n# Generated by `agroforecast init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        let Ok(re) = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
            return result;
        };

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }
}
