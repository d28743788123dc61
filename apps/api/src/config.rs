use anyhow::{Context, Result};

/// Process-level configuration loaded from environment variables.
/// AI provider settings are read separately by `providers::ProviderRegistry::from_env`.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on a single provider call, in seconds.
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            port: parse_or("PORT", 5001, &lookup)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            request_timeout_secs: parse_or("AI_REQUEST_TIMEOUT_SECS", 120, &lookup)?,
        })
    }
}

fn parse_or<T, F>(key: &str, default: T, lookup: &F) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
