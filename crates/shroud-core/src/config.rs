//! Configuration module
//!
//! Client configuration is read once at startup. The service origin is fixed for the
//! lifetime of the process.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_API_URL, DEFAULT_HTTP_TIMEOUT_SECS};

const TOKEN_DIR: &str = ".shroud";
const TOKEN_FILE: &str = "session.json";
const FALLBACK_TOKEN_FILE: &str = ".shroud-session.json";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub token_path: PathBuf,
    pub http_timeout_secs: u64,
    pub environment: String,
    /// "text" or "json".
    pub log_format: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_path: default_token_path(env::var("HOME").ok()),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            environment: "development".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("SHROUD_API_URL")
            .or_else(|| lookup("API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let token_path = lookup("SHROUD_TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_token_path(lookup("HOME")));

        let http_timeout_secs = match lookup("SHROUD_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                anyhow::anyhow!("SHROUD_HTTP_TIMEOUT_SECS must be an integer: {}", e)
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let environment =
            lookup("SHROUD_ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let log_format = lookup("SHROUD_LOG_FORMAT").unwrap_or_else(|| "text".to_string());

        let config = Self {
            api_url,
            token_path,
            http_timeout_secs,
            environment,
            log_format,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            anyhow::bail!(
                "SHROUD_API_URL must start with http:// or https:// (got {})",
                self.api_url
            );
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("SHROUD_HTTP_TIMEOUT_SECS must be greater than 0");
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn is_production(&self) -> bool {
        matches!(
            self.environment.to_lowercase().as_str(),
            "production" | "prod"
        )
    }
}

fn default_token_path(home: Option<String>) -> PathBuf {
    match home {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(TOKEN_DIR).join(TOKEN_FILE),
        _ => PathBuf::from(FALLBACK_TOKEN_FILE),
    }
}
