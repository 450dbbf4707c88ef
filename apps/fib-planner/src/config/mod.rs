//! Configuration loading for the planner.
//!
//! Configuration is optional. Without a file every section takes its
//! built-in default, including the reset record for trade inputs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fib_planner::config::load_config;
//!
//! // Explicit file
//! let config = load_config(Some("fib-planner.yaml".as_ref()))?;
//!
//! // `fib-planner.yaml` in the working directory if present, else defaults
//! let config = load_config(None)?;
//!
//! println!("risk: {}%", config.defaults.risk_percent);
//! ```
//!
//! # Example file
//!
//! ```yaml
//! defaults:
//!   accountSize: ${ACCOUNT_SIZE:-10000}
//!   riskPercent: 2
//!   entryPrice: 158.27
//!   stopLoss: 162.51
//!   level1Price: 155.84
//!   tpPrice: 154.12
//! output:
//!   format: text
//!   decimals: 2
//!   advanced: false
//! observability:
//!   logging:
//!     level: warn
//!     format: compact
//! ```

mod observability;
mod output;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plan::{TradeInputs, validate};

pub use observability::{LogFormat, LoggingConfig, ObservabilityConfig};
pub use output::{OutputConfig, OutputFormat};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "fib-planner.yaml";

/// Most fractional digits the report will render.
pub const MAX_DECIMALS: u32 = 8;

const VALID_LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Record restored by `reset` and used as the starting inputs.
    #[serde(default)]
    pub defaults: TradeInputs,
    /// Report output.
    #[serde(default)]
    pub output: OutputConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// With `None`, [`DEFAULT_CONFIG_PATH`] is used if it exists; otherwise the
/// built-in defaults are returned.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(path) => path,
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_PATH);
            if !fallback.exists() {
                tracing::debug!("no config file found; using built-in defaults");
                return Ok(Config::default());
            }
            fallback
        }
    };

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let config = load_config_from_string(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |caps: &regex::Captures<'_>| {
        let default_value = caps.get(2).map_or("", |m| m.as_str());
        match std::env::var(&caps[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.output.decimals > MAX_DECIMALS {
        return Err(ConfigError::ValidationError(format!(
            "output.decimals must be at most {MAX_DECIMALS}"
        )));
    }

    let level = config.observability.logging.level.to_lowercase();
    if !VALID_LOG_LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.level must be one of: {VALID_LOG_LEVELS:?}"
        )));
    }

    // Invalid defaults are still usable: the plan is simply withheld.
    let errors = validate(&config.defaults);
    if !errors.is_empty() {
        tracing::warn!(%errors, "configured default inputs do not form a valid plan");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.defaults, TradeInputs::default());
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.output.decimals, 2);
        assert!(!config.output.advanced);
        assert_eq!(config.observability.logging.level, "warn");
        assert_eq!(config.observability.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_empty_string_is_default() {
        let config = load_config_from_string("  \n").unwrap();
        assert_eq!(config.defaults, TradeInputs::default());
    }

    #[test]
    fn test_partial_defaults_override() {
        let yaml = r"
defaults:
  accountSize: 25000
  riskPercent: 1.5
output:
  format: json
  advanced: true
";
        let config = load_config_from_string(yaml).unwrap();
        assert_eq!(config.defaults.account_size, dec!(25000));
        assert_eq!(config.defaults.risk_percent, dec!(1.5));
        assert_eq!(config.defaults.entry_price, dec!(158.27));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.advanced);
        assert_eq!(config.output.decimals, 2);
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "accountSize: ${FIB_PLANNER_TEST_NONEXISTENT_VAR:-5000}";
        assert_eq!(interpolate_env_vars(input), "accountSize: 5000");
    }

    #[test]
    fn test_env_var_with_default_uses_existing() {
        // PATH should always exist
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);
        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "level: ${FIB_PLANNER_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "level: ");
    }

    #[test]
    fn test_interpolated_defaults() {
        let yaml = "defaults:\n  tpPrice: ${FIB_PLANNER_TEST_MISSING_TP:-150.5}\n";
        let config = load_config_from_string(yaml).unwrap();
        assert_eq!(config.defaults.tp_price, dec!(150.5));
    }

    #[test]
    fn test_validation_too_many_decimals() {
        let yaml = "output:\n  decimals: 12\n";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for decimals");
        };
        assert!(err.to_string().contains("output.decimals"));
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let yaml = "observability:\n  logging:\n    level: loud\n";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for log level");
        };
        assert!(err.to_string().contains("observability.logging.level"));
    }

    #[test]
    fn test_invalid_defaults_are_accepted() {
        let yaml = "defaults:\n  stopLoss: 100\n";
        let config = load_config_from_string(yaml).unwrap();
        assert!(!validate(&config.defaults).is_empty());
    }

    #[test]
    fn test_malformed_yaml() {
        let result = load_config_from_string("output: [unclosed");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = load_config(Some(Path::new("/nonexistent/fib-planner.yaml")));
        let Err(ConfigError::ReadError { path, .. }) = result else {
            panic!("expected read error");
        };
        assert!(path.contains("fib-planner.yaml"));
    }
}
