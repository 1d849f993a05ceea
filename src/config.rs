//! Process configuration, read once from the environment at startup.

use std::env;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_max_size: u32,
    pub pool_timeout: Duration,
}

impl DatabaseConfig {
    /// Pool settings with defaults for everything but the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool_max_size: DEFAULT_POOL_MAX_SIZE,
            pool_timeout: Duration::from_secs(DEFAULT_POOL_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Read `DATABASE_URL`, `HOST`, `PORT`, `DB_POOL_MAX_SIZE` and
    /// `DB_POOL_TIMEOUT_SECS` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;

        let pool_max_size = parse_or(&lookup, "DB_POOL_MAX_SIZE", DEFAULT_POOL_MAX_SIZE)?;
        if pool_max_size == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_POOL_MAX_SIZE",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let pool_timeout_secs =
            parse_or(&lookup, "DB_POOL_TIMEOUT_SECS", DEFAULT_POOL_TIMEOUT_SECS)?;

        Ok(Self {
            database: DatabaseConfig {
                url,
                pool_max_size,
                pool_timeout: Duration::from_secs(pool_timeout_secs),
            },
            host,
            port,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_the_url_is_set() {
        let config =
            Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/db")])).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database, DatabaseConfig::new("postgres://localhost/db"));
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert_eq!(
            Config::from_lookup(lookup(&[("PORT", "9000")])),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("DATABASE_URL", " ")])),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("DB_POOL_MAX_SIZE", "3"),
            ("DB_POOL_TIMEOUT_SECS", "1"),
        ]))
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.database.pool_max_size, 3);
        assert_eq!(config.database.pool_timeout, Duration::from_secs(1));
    }

    #[test]
    fn invalid_port_is_reported_with_its_key() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db"),
            ("DB_POOL_MAX_SIZE", "0"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { key: "DB_POOL_MAX_SIZE", .. }));
    }
}
