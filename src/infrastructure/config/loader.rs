use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;
use crate::services::validators;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid timeout '{name}': must be greater than 0")]
    InvalidTimeout { name: &'static str },

    #[error(
        "Invalid stop budget: stop_ms ({0}) must be less than generation_ms ({1})"
    )]
    InvalidStopBudget(u64, u64),

    #[error("Invalid default_language: {0} is not a BCP-47 tag")]
    InvalidDefaultLanguage(String),

    #[error("API base_url cannot be empty")]
    EmptyBaseUrl,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .lureforge/config.yaml (project config)
    /// 3. .lureforge/local.yaml (local overrides, optional)
    /// 4. Environment variables (LUREFORGE_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".lureforge/config.yaml"))
            .merge(Yaml::file(".lureforge/local.yaml"))
            .merge(Env::prefixed("LUREFORGE_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &Config) -> Result<(), ConfigError> {
        match config.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(ConfigError::InvalidLogLevel(other.to_string())),
        }
        match config.logging.format.as_str() {
            "json" | "pretty" => {}
            other => return Err(ConfigError::InvalidLogFormat(other.to_string())),
        }

        let timeouts = &config.timeouts;
        for (name, value) in [
            ("generation_ms", timeouts.generation_ms),
            ("tool_ms", timeouts.tool_ms),
            ("stop_ms", timeouts.stop_ms),
            ("call_ms", timeouts.call_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidTimeout { name });
            }
        }
        if timeouts.stop_ms >= timeouts.generation_ms {
            return Err(ConfigError::InvalidStopBudget(
                timeouts.stop_ms,
                timeouts.generation_ms,
            ));
        }

        if validators::normalize_language(Some(&config.default_language))
            != config.default_language
        {
            return Err(ConfigError::InvalidDefaultLanguage(
                config.default_language.clone(),
            ));
        }

        if config.api.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_from_file_merges_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "timeouts:\n  generation_ms: 60000\nlogging:\n  level: debug"
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.timeouts.generation_ms, 60_000);
        assert_eq!(config.logging.level, "debug");
        // Untouched sections keep their defaults.
        assert_eq!(config.default_language, "en-US");
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "logging:\n  level: verbose").unwrap();

        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }

    #[test]
    fn stop_budget_must_stay_below_generation_budget() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "timeouts:\n  generation_ms: 5000\n  stop_ms: 5000"
        )
        .unwrap();

        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("stop_ms"));
    }

    #[test]
    fn malformed_default_language_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_language: \"not a tag\"").unwrap();

        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("BCP-47"));
    }
}
