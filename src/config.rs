/// Service configuration from the environment.
///
/// Values come from process environment variables, with a `.env` file in
/// the working directory loaded first if present.
///
/// | Variable            | Default          |
/// |---------------------|------------------|
/// | `CRAG_REGISTRY`     | built-in crags   |
/// | `PAST_DAYS`         | 2                |
/// | `FORECAST_DAYS`     | 3                |
/// | `LOG_LEVEL`         | info             |
/// | `LOG_FILE`          | none             |
/// | `HTTP_TIMEOUT_SECS` | 30               |

use std::collections::HashMap;
use std::env;
use std::str::FromStr;

use crate::ingest::open_meteo::ForecastWindow;
use crate::logging::LogLevel;
use crate::model::ConditionsError;

/// Open-Meteo serves at most 92 days of history and 16 of forecast.
const MAX_PAST_DAYS: u32 = 92;
const MAX_FORECAST_DAYS: u32 = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub registry_path: Option<String>,
    pub window: ForecastWindow,
    pub log_level: LogLevel,
    pub log_file: Option<String>,
    pub http_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            registry_path: None,
            window: ForecastWindow::default(),
            log_level: LogLevel::Info,
            log_file: None,
            http_timeout_secs: 30,
        }
    }
}

impl ServiceConfig {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, ConditionsError> {
        dotenv::dotenv().ok();
        Self::from_vars(&env::vars().collect())
    }

    /// Builds a config from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConditionsError> {
        let defaults = Self::default();
        let non_empty = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let past_days = parse_var(vars, "PAST_DAYS", defaults.window.past_days)?;
        let forecast_days = parse_var(vars, "FORECAST_DAYS", defaults.window.forecast_days)?;
        if past_days > MAX_PAST_DAYS {
            return Err(ConditionsError::Config(format!(
                "PAST_DAYS must be at most {}, got {}",
                MAX_PAST_DAYS, past_days
            )));
        }
        if forecast_days == 0 || forecast_days > MAX_FORECAST_DAYS {
            return Err(ConditionsError::Config(format!(
                "FORECAST_DAYS must be between 1 and {}, got {}",
                MAX_FORECAST_DAYS, forecast_days
            )));
        }

        Ok(Self {
            registry_path: non_empty("CRAG_REGISTRY").map(String::from),
            window: ForecastWindow {
                past_days,
                forecast_days,
            },
            log_level: parse_var(vars, "LOG_LEVEL", defaults.log_level)?,
            log_file: non_empty("LOG_FILE").map(String::from),
            http_timeout_secs: parse_var(vars, "HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
        })
    }
}

fn parse_var<T>(vars: &HashMap<String, String>, key: &str, default: T) -> Result<T, ConditionsError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e| ConditionsError::Config(format!("invalid {} '{}': {}", key, raw, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServiceConfig::from_vars(&HashMap::new()).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.window.past_days, 2);
        assert_eq!(config.window.forecast_days, 3);
    }

    #[test]
    fn test_reads_all_variables() {
        let config = ServiceConfig::from_vars(&vars(&[
            ("CRAG_REGISTRY", "./crags.toml"),
            ("PAST_DAYS", "3"),
            ("FORECAST_DAYS", "7"),
            ("LOG_LEVEL", "debug"),
            ("LOG_FILE", "/tmp/crags.log"),
            ("HTTP_TIMEOUT_SECS", "10"),
        ]))
        .unwrap();
        assert_eq!(config.registry_path.as_deref(), Some("./crags.toml"));
        assert_eq!(config.window, ForecastWindow { past_days: 3, forecast_days: 7 });
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_file.as_deref(), Some("/tmp/crags.log"));
        assert_eq!(config.http_timeout_secs, 10);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = ServiceConfig::from_vars(&vars(&[("LOG_FILE", ""), ("PAST_DAYS", " ")])).unwrap();
        assert_eq!(config.log_file, None);
        assert_eq!(config.window.past_days, 2);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        for (key, value) in [
            ("PAST_DAYS", "two"),
            ("FORECAST_DAYS", "0"),
            ("FORECAST_DAYS", "30"),
            ("PAST_DAYS", "100"),
            ("LOG_LEVEL", "loud"),
            ("HTTP_TIMEOUT_SECS", "-1"),
        ] {
            let result = ServiceConfig::from_vars(&vars(&[(key, value)]));
            assert!(
                matches!(result, Err(ConditionsError::Config(_))),
                "{}={} should be rejected, got {:?}",
                key,
                value,
                result
            );
        }
    }
}
