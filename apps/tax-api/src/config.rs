//! Tax API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::path::PathBuf;

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

/// Origin the storefront is served from.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://voteforme-md.github.io";

/// Tax API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP server port
    pub port: u16,

    /// Interface to bind
    pub bind_address: String,

    /// Path to the jurisdiction rate table (CSV)
    pub rates_path: PathBuf,

    /// Browser origins allowed to call the API
    pub allowed_origins: Vec<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key → value source.
    pub fn from_source<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ApiConfig {
            port: var("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            bind_address: var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_string()),

            rates_path: var("TAX_RATES_PATH")
                .unwrap_or_else(|| "./data/tax_rates.csv".to_string())
                .into(),

            allowed_origins: var("ALLOWED_ORIGINS")
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string())
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
        };

        if config.allowed_origins.is_empty() {
            return Err(ConfigError::MissingRequired("ALLOWED_ORIGINS".to_string()));
        }

        // Origins end up in response headers; reject anything that cannot.
        if config
            .allowed_origins
            .iter()
            .any(|origin| HeaderValue::from_str(origin).is_err())
        {
            return Err(ConfigError::InvalidValue("ALLOWED_ORIGINS".to_string()));
        }

        Ok(config)
    }

    /// `bind_address:port`
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.listen_address(), "0.0.0.0:3000");
        assert_eq!(config.rates_path, PathBuf::from("./data/tax_rates.csv"));
        assert_eq!(config.allowed_origins, vec![DEFAULT_ALLOWED_ORIGIN.to_string()]);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "8080"),
            ("BIND_ADDRESS", "127.0.0.1"),
            ("TAX_RATES_PATH", "/srv/rates.csv"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
        ])
        .unwrap();

        assert_eq!(config.listen_address(), "127.0.0.1:8080");
        assert_eq!(config.rates_path, PathBuf::from("/srv/rates.csv"));
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn test_invalid_port() {
        assert!(matches!(
            load(&[("PORT", "http")]),
            Err(ConfigError::InvalidValue(key)) if key == "PORT"
        ));
    }

    #[test]
    fn test_empty_origin_list() {
        assert!(matches!(
            load(&[("ALLOWED_ORIGINS", " , ")]),
            Err(ConfigError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_unrepresentable_origin() {
        assert!(matches!(
            load(&[("ALLOWED_ORIGINS", "https://bad\nexample")]),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
