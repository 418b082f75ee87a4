//! Environment-driven configuration primitives shared by the todo binaries.
//!
//! Every config struct implements [`FromEnv`] on top of the small helpers
//! here, so a missing or malformed variable surfaces as a [`ConfigError`]
//! naming the offending key.

pub mod server;
pub mod tracing;

use std::env;
use std::str::FromStr;
use thiserror::Error;

pub use server::ListenerConfig;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Application environment, selects log formatting
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        if app_env.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Trait for configuration that can be loaded from environment variables
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

/// Helper to load an environment variable with a default value
pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Helper to load an environment variable or return error
///
/// A variable that is set but empty counts as missing.
pub fn env_required(key: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvVar(key.to_string())),
    }
}

/// Parse a raw value, attributing failures to `key`
pub fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
        key: key.to_string(),
        details: e.to_string(),
    })
}

/// Load and parse an environment variable, falling back to `default` when unset
pub fn env_parse_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

/// Load and parse a required environment variable
pub fn env_parse_required<T>(key: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env_required(key)?;
    parse_value(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defaults_to_development() {
        temp_env::with_var_unset("APP_ENV", || {
            let env = Environment::from_env();
            assert_eq!(env, Environment::Development);
            assert!(!env.is_production());
        });
    }

    #[test]
    fn test_environment_production_case_insensitive() {
        temp_env::with_var("APP_ENV", Some("PRODUCTION"), || {
            assert_eq!(Environment::from_env(), Environment::Production);
        });

        temp_env::with_var("APP_ENV", Some("Production"), || {
            assert!(Environment::from_env().is_production());
        });
    }

    #[test]
    fn test_environment_unknown_defaults_to_development() {
        temp_env::with_var("APP_ENV", Some("staging"), || {
            assert_eq!(Environment::from_env(), Environment::Development);
        });
    }

    #[test]
    fn test_env_or_default_without_value() {
        temp_env::with_var_unset("TODO_MISSING_VAR", || {
            let result = env_or_default("TODO_MISSING_VAR", "default_value");
            assert_eq!(result, "default_value");
        });
    }

    #[test]
    fn test_env_required_missing() {
        temp_env::with_var_unset("TODO_MISSING_REQUIRED", || {
            let err = env_required("TODO_MISSING_REQUIRED").unwrap_err();
            assert!(err.to_string().contains("TODO_MISSING_REQUIRED"));
            assert!(err.to_string().contains("required"));
        });
    }

    #[test]
    fn test_env_required_empty_counts_as_missing() {
        temp_env::with_var("TODO_EMPTY_REQUIRED", Some("  "), || {
            let err = env_required("TODO_EMPTY_REQUIRED").unwrap_err();
            assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "TODO_EMPTY_REQUIRED"));
        });
    }

    #[test]
    fn test_env_parse_or_default() {
        temp_env::with_var_unset("TODO_TIMEOUT", || {
            assert_eq!(env_parse_or_default("TODO_TIMEOUT", 5u64).unwrap(), 5);
        });

        temp_env::with_var("TODO_TIMEOUT", Some("12"), || {
            assert_eq!(env_parse_or_default("TODO_TIMEOUT", 5u64).unwrap(), 12);
        });

        temp_env::with_var("TODO_TIMEOUT", Some("soon"), || {
            let err = env_parse_or_default("TODO_TIMEOUT", 5u64).unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { key, .. } if key == "TODO_TIMEOUT"));
        });
    }

    #[test]
    fn test_env_parse_required() {
        temp_env::with_var("TODO_PORT", Some("9090"), || {
            let port: u16 = env_parse_required("TODO_PORT").unwrap();
            assert_eq!(port, 9090);
        });

        temp_env::with_var_unset("TODO_PORT", || {
            assert!(env_parse_required::<u16>("TODO_PORT").is_err());
        });
    }
}
