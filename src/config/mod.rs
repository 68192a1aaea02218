use std::collections::BTreeSet;
use std::env;
use std::fmt;

use crate::eligibility::{EngineConfig, VulnerabilityConfig};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let poverty_line = parse_f64_var("POVERTY_LINE", 75_000.0)?;
        if poverty_line <= 0.0 {
            return Err(ConfigError::InvalidPovertyLine);
        }

        let eligibility_threshold = parse_f64_var("ELIGIBILITY_THRESHOLD", 60.0)?;
        if !(0.0..=100.0).contains(&eligibility_threshold) {
            return Err(ConfigError::InvalidThreshold);
        }

        let score_max_age_days = match env::var("SCORE_MAX_AGE_DAYS") {
            Ok(raw) => raw.trim().parse::<i64>().map_err(|_| ConfigError::Invalid {
                variable: "SCORE_MAX_AGE_DAYS",
            })?,
            Err(_) => 30,
        };

        let rural_divisions = env::var("RURAL_DIVISIONS")
            .map(|raw| {
                raw.split(',')
                    .map(|division| division.trim().to_string())
                    .filter(|division| !division.is_empty())
                    .collect::<BTreeSet<String>>()
            })
            .unwrap_or_default();

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringSettings {
                poverty_line,
                rural_divisions,
                eligibility_threshold,
                score_max_age_days,
            },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Deployment-specific scoring inputs sourced from the environment.
#[derive(Debug, Clone)]
pub struct ScoringSettings {
    pub poverty_line: f64,
    pub rural_divisions: BTreeSet<String>,
    pub eligibility_threshold: f64,
    pub score_max_age_days: i64,
}

impl ScoringSettings {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            eligibility_threshold: self.eligibility_threshold,
            ..EngineConfig::default()
        }
    }

    pub fn vulnerability_config(&self) -> VulnerabilityConfig {
        VulnerabilityConfig {
            poverty_line: self.poverty_line,
            rural_divisions: self.rural_divisions.clone(),
            ..VulnerabilityConfig::default()
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPovertyLine,
    InvalidThreshold,
    Invalid { variable: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPovertyLine => {
                write!(f, "POVERTY_LINE must be a positive real number")
            }
            ConfigError::InvalidThreshold => {
                write!(f, "ELIGIBILITY_THRESHOLD must lie in [0, 100]")
            }
            ConfigError::Invalid { variable } => {
                write!(f, "{variable} could not be parsed")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn parse_f64_var(variable: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::Invalid { variable }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("POVERTY_LINE");
        env::remove_var("ELIGIBILITY_THRESHOLD");
        env::remove_var("SCORE_MAX_AGE_DAYS");
        env::remove_var("RURAL_DIVISIONS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.scoring.poverty_line, 75_000.0);
        assert_eq!(config.scoring.eligibility_threshold, 60.0);
        assert!(config.scoring.rural_divisions.is_empty());
    }

    #[test]
    fn parses_rural_division_list() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RURAL_DIVISIONS", "NYANGA, OGOOUE-LOLO ,WOLEU-NTEM");
        let config = AppConfig::load().expect("config loads");
        assert!(config.scoring.rural_divisions.contains("NYANGA"));
        assert!(config.scoring.rural_divisions.contains("OGOOUE-LOLO"));
        assert_eq!(config.scoring.rural_divisions.len(), 3);
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ELIGIBILITY_THRESHOLD", "140");
        let error = AppConfig::load().expect_err("threshold must be rejected");
        assert!(matches!(error, ConfigError::InvalidThreshold));
    }
}
