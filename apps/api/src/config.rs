use anyhow::{Context, Result};

/// Server configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Settings for a process that embeds the session controller and talks to
/// this API over HTTP.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Base URL of the Genie API, without a trailing slash.
    pub api_base_url: String,
    /// Voice workflow that runs the onboarding ("generate") script.
    pub workflow_id: String,
}

impl SessionSettings {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url = std::env::var("GENIE_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(SessionSettings {
            api_base_url,
            workflow_id: require_env("VOICE_WORKFLOW_ID")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
