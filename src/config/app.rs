//! Main application configuration
//!
//! This module defines the primary configuration structures for the rating
//! engine and its CLI, including environment variable and TOML file loading
//! and validation.

use crate::config::rating::RatingConfig;
use crate::rating::scale::DEFAULT_SIGMA_FLOOR_FRACTION;
use crate::types::Scale;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "foosball-rating".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from a TOML file, then validate it
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Service settings
        if let Some(name) = lookup("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Some(log_level) = lookup("LOG_LEVEL") {
            config.service.log_level = log_level;
        }

        // Rating settings, per scale. The floor follows the initial sigma.
        let floor_fraction = parse_var::<_, f64>(&lookup, "SIGMA_FLOOR_FRACTION")?;
        for scale in Scale::ALL {
            let prefix = scale.to_string().to_uppercase();
            let params = config.rating.for_scale_mut(scale);

            if let Some(mu) = parse_var(&lookup, &format!("{}_INITIAL_MU", prefix))? {
                params.initial_mu = mu;
            }
            let sigma = parse_var(&lookup, &format!("{}_INITIAL_SIGMA", prefix))?;
            if let Some(sigma) = sigma {
                params.initial_sigma = sigma;
            }
            if let Some(beta) = parse_var(&lookup, &format!("{}_BETA", prefix))? {
                params.beta = beta;
            }

            if sigma.is_some() || floor_fraction.is_some() {
                *params = params
                    .with_floor_fraction(floor_fraction.unwrap_or(DEFAULT_SIGMA_FLOOR_FRACTION));
            }
        }

        validate_config(&config)?;
        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid {} value: {}", name, value)),
        None => Ok(None),
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.rating.validate()?;

    Ok(())
}
