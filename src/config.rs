use crate::scrapers::fetcher::DEFAULT_USER_AGENT;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_DATA_PATH: &str = "data/listings.json";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    /// JSON file the store is persisted to (DATA_PATH)
    pub data_path: PathBuf,
    pub log_level: String,
    /// Required in X-API-Key for mutating routes; unset or empty disables the check
    pub api_key: Option<String>,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            data_path: std::env::var("DATA_PATH")
                .unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string())
                .into(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            api_key: std::env::var("API_KEY").ok().filter(|key| !key.trim().is_empty()),
            fetch_timeout_secs: match std::env::var("FETCH_TIMEOUT_SECS") {
                Ok(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .context("FETCH_TIMEOUT_SECS must be a whole number of seconds")?,
                Err(_) => DEFAULT_FETCH_TIMEOUT_SECS,
            },
            user_agent: std::env::var("USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
        })
    }
}
