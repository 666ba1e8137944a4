// src/config.rs

use std::{env, fmt, str::FromStr};

use url::Url;

const DEFAULT_LLM_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
const DEFAULT_LLM_MODEL: &str = "deepseek-chat";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

/// Error raised while reading configuration from the environment.
#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, reason } => write!(f, "{} is invalid: {}", key, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for the upstream chat-completions API.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// When absent the assistant answers from its offline fallback table.
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_LLM_API_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// JWT lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub remember_token_days: i64,
    pub cors_origins: Vec<String>,
    pub static_dir: String,
    pub llm: LlmConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let api_key = env::var("LLM_API_KEY")
            .or_else(|_| env::var("DEEPSEEK_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        let api_url = env::var("LLM_API_URL")
            .or_else(|_| env::var("DEEPSEEK_API_URL"))
            .unwrap_or_else(|_| DEFAULT_LLM_API_URL.to_string());
        Url::parse(&api_url).map_err(|e| ConfigError::Invalid {
            key: "LLM_API_URL",
            reason: e.to_string(),
        })?;

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration: parsed_or("JWT_EXPIRATION", 7 * 24 * 60 * 60)?,
            rust_log,
            port: parsed_or("PORT", 3000)?,
            db_max_connections: parsed_or("DB_MAX_CONNECTIONS", 10)?,
            db_acquire_timeout_secs: parsed_or("DB_ACQUIRE_TIMEOUT_SECS", 3)?,
            remember_token_days: parsed_or("REMEMBER_TOKEN_DAYS", 30)?,
            cors_origins,
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string()),
            llm: LlmConfig {
                api_key,
                api_url,
                model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            },
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn parsed_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_or_falls_back_when_unset() {
        let value: u16 = parsed_or("HERITAGE_TEST_UNSET_PORT", 4242).unwrap();
        assert_eq!(value, 4242);
    }

    #[test]
    fn config_error_names_the_key() {
        let err = ConfigError::Missing("DATABASE_URL");
        assert_eq!(err.to_string(), "DATABASE_URL must be set");

        let err = ConfigError::Invalid {
            key: "PORT",
            reason: "invalid digit found in string".to_string(),
        };
        assert!(err.to_string().starts_with("PORT is invalid"));
    }
}
