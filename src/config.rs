// src/config.rs
//! Environment-driven configuration, read once at startup.

use std::env;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TIMEOUT_SECS: u64 = 8;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Gemini API key. May be empty: the service still boots and every
    /// classification degrades to the fallback record.
    pub api_key: String,
    /// Model name appended to the generateContent URL.
    pub model: String,
    /// HTTP listen port.
    pub port: u16,
    /// Total per-request timeout for the model call; expiry counts as a
    /// collaborator failure.
    pub timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = env::var("GEMINI_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!("GEMINI_API_KEY is empty; all classifications will use the fallback record");
        }

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("PORT must be a number in 1..=65535, got {raw:?}"))?,
            Err(_) => DEFAULT_PORT,
        };

        let timeout_secs = match env::var("GEMINI_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("GEMINI_TIMEOUT_SECS must be an integer, got {raw:?}"))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            model,
            port,
            timeout_secs,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            port: DEFAULT_PORT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
