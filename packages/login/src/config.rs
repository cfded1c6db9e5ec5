use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            api_base_url: env::var("API_BASE_URL").context("API_BASE_URL must be set")?,
            api_token: env::var("API_TOKEN").context("API_TOKEN must be set")?,
        })
    }
}
