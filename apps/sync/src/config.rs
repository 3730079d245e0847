use anyhow::{Context, Result};

/// Sync-service configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub zoho_access_token: String,
    /// Base URL of the Zoho People API, overridable for testing.
    pub zoho_api_base: String,
    pub anthropic_api_key: String,
    pub sync_interval_minutes: i64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            zoho_access_token: require_env("ZOHO_ACCESS_TOKEN")?,
            zoho_api_base: std::env::var("ZOHO_API_BASE")
                .unwrap_or_else(|_| "https://people.zoho.in/people/api".to_string()),
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            sync_interval_minutes: std::env::var("SYNC_INTERVAL_MINUTES")
                .unwrap_or_else(|_| "5".to_string())
                .parse::<i64>()
                .context("SYNC_INTERVAL_MINUTES must be a positive integer")?,
            port: std::env::var("SYNC_PORT")
                .unwrap_or_else(|_| "8001".to_string())
                .parse::<u16>()
                .context("SYNC_PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
