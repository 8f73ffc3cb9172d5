// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_FRONTEND_URL: &str = "https://alexeiyaganov.github.io";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 600;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Origin of the web app (allowed by CORS)
    pub frontend_url: String,
    /// Directory for the training JSON snapshots. Persistence is off when unset.
    pub data_dir: Option<PathBuf>,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Seed the promotional premium sessions at startup
    pub seed_premium: bool,
    /// How often the background task purges expired trainings
    pub sweep_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid("PORT", raw))?,
            Err(_) => DEFAULT_PORT,
        };

        let request_timeout = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS", raw))?,
            Err(_) => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let sweep_interval = match env::var("SWEEP_INTERVAL_SECS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::Invalid("SWEEP_INTERVAL_SECS", raw)),
            },
            Err(_) => Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        };

        let seed_premium = match env::var("SEED_PREMIUM") {
            Ok(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid("SEED_PREMIUM", raw))?,
            Err(_) => true,
        };

        Ok(Self {
            port,
            frontend_url: env::var("FRONTEND_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            data_dir: env::var("DATA_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            request_timeout,
            seed_premium,
            sweep_interval,
        })
    }

    /// Config for tests: in-memory stores, no premium seed.
    pub fn test_default() -> Self {
        Self {
            port: DEFAULT_PORT,
            frontend_url: "http://localhost:5173".to_string(),
            data_dir: None,
            request_timeout: Duration::from_secs(5),
            seed_premium: false,
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}
