use std::{fmt::Display, str::FromStr};

use anyhow::{anyhow, Context};
use tracing::info;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub allowed_origin: String,
    pub port: u16,
    pub log_level: tracing::Level,
}

impl Config {
    /// Reads the environment, with `.env` values filling in anything unset.
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: try_load("DATABASE_URL", "sqlite://devconnect.db?mode=rwc")?,
            jwt_secret: dotenv::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            allowed_origin: try_load("ALLOWED_ORIGIN", "http://localhost:5173")?,
            port: try_load("PORT", "7777")?,
            log_level: try_load("LOG_LEVEL", "info")?,
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = dotenv::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow!("invalid {key} value {raw:?}: {e}"))
}
