use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

pub struct Config {
    pub database_url: String,

    pub discord_bot_token: String,
    /// Known up front when set; otherwise learned from the gateway or the application info endpoint.
    pub discord_application_id: Option<u64>,

    pub admin_api_token: String,
    pub bind_address: String,
    pub cache_enabled: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            discord_application_id: optional("DISCORD_APPLICATION_ID")
                .map(|value| parse_env("DISCORD_APPLICATION_ID", &value))
                .transpose()?,
            admin_api_token: required("ADMIN_API_TOKEN")?,
            bind_address: optional("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            cache_enabled: optional("CACHE_ENABLED")
                .map(|value| parse_env("CACHE_ENABLED", &value))
                .transpose()?
                .unwrap_or(true),
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            reason: e.to_string(),
        })
}
