use std::str::FromStr;

use anyhow::{bail, Context, Result};

const DEFAULT_CRAWLER_API_URL: &str = "https://api.webcrawlerapi.com/v2/scrape";

/// How the parent overview (taken count, average score) is kept up to date
/// after a feedback write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverviewMode {
    /// Re-run the aggregator over every feedback record of the parent.
    #[default]
    Recompute,
    /// Adjust the counters in place without reading sibling feedback.
    Incremental,
}

impl FromStr for OverviewMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recompute" => Ok(OverviewMode::Recompute),
            "incremental" => Ok(OverviewMode::Incremental),
            other => bail!("OVERVIEW_MODE must be 'recompute' or 'incremental', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub crawler_api_key: String,
    pub crawler_api_url: String,
    pub auth_jwt_secret: String,
    pub overview_mode: OverviewMode,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let overview_mode = match std::env::var("OVERVIEW_MODE") {
            Ok(raw) => raw.parse()?,
            Err(_) => OverviewMode::default(),
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            crawler_api_key: require_env("CRAWLER_API_KEY")?,
            crawler_api_url: std::env::var("CRAWLER_API_URL")
                .unwrap_or_else(|_| DEFAULT_CRAWLER_API_URL.to_string()),
            auth_jwt_secret: require_env("AUTH_JWT_SECRET")?,
            overview_mode,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_mode_parses_case_insensitively() {
        assert_eq!(
            "Recompute".parse::<OverviewMode>().unwrap(),
            OverviewMode::Recompute
        );
        assert_eq!(
            " incremental ".parse::<OverviewMode>().unwrap(),
            OverviewMode::Incremental
        );
    }

    #[test]
    fn test_overview_mode_rejects_unknown_value() {
        assert!("sometimes".parse::<OverviewMode>().is_err());
    }

    #[test]
    fn test_overview_mode_default_is_recompute() {
        assert_eq!(OverviewMode::default(), OverviewMode::Recompute);
    }
}
