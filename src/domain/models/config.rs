//! Main configuration structure for lureforge.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Platform API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Deadline budgets for external calls
    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Default BCP-47 language tag when neither the request nor the
    /// resolved user carries one
    #[serde(default = "default_language")]
    pub default_language: String,
}

fn default_language() -> String {
    "en-US".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            timeouts: TimeoutConfig::default(),
            logging: LoggingConfig::default(),
            default_language: default_language(),
        }
    }
}

/// Platform API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ApiConfig {
    /// Base URL of the simulation platform
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "https://api.example-awareness.io".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Deadline budgets, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TimeoutConfig {
    /// Budget for a primary generation call
    #[serde(default = "default_generation_ms")]
    pub generation_ms: u64,

    /// Budget for upload/assign/resolution tool calls
    #[serde(default = "default_tool_ms")]
    pub tool_ms: u64,

    /// Budget for the session-termination stop turn. Kept materially
    /// shorter than the generation budget; delivery is best-effort.
    #[serde(default = "default_stop_ms")]
    pub stop_ms: u64,

    /// Budget for placing an outbound voice call
    #[serde(default = "default_call_ms")]
    pub call_ms: u64,
}

const fn default_generation_ms() -> u64 {
    120_000
}

const fn default_tool_ms() -> u64 {
    30_000
}

const fn default_stop_ms() -> u64 {
    10_000
}

const fn default_call_ms() -> u64 {
    45_000
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            generation_ms: default_generation_ms(),
            tool_ms: default_tool_ms(),
            stop_ms: default_stop_ms(),
            call_ms: default_call_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
