//! Process configuration
//!
//! Read from the environment once at startup. Binaries call
//! `dotenv::dotenv()` first so a local `.env` file is honoured.

use crate::error::BotError;
use crate::Result;
use std::time::Duration;

const DEFAULT_VERIFY_URL: &str = "http://localhost:8005";
const DEFAULT_VERIFY_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Shared secret the webhook surface expects as a bearer token
    pub bot_token: Option<String>,
    /// Username that `/start@<name>` must address
    pub bot_name: Option<String>,
    pub verify_url: String,
    pub verify_timeout: Duration,
    pub port: u16,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let verify_timeout_secs = match get("VERIFY_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                BotError::Config(format!("VERIFY_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            None => DEFAULT_VERIFY_TIMEOUT_SECS,
        };
        if verify_timeout_secs == 0 {
            return Err(BotError::Config(
                "VERIFY_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        let port = match get("PORT").or_else(|| get("API_PORT")) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| BotError::Config(format!("PORT is not a valid port: {}", raw)))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            bot_token: get("BOT_TOKEN"),
            bot_name: get("BOT_NAME"),
            verify_url: get("VERIFY_URL").unwrap_or_else(|| DEFAULT_VERIFY_URL.to_string()),
            verify_timeout: Duration::from_secs(verify_timeout_secs),
            port,
        })
    }
}
