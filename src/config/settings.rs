use crate::error::ConfigError;
use regex::Regex;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/storefront";
pub const DEFAULT_SCHEMA: &str = "storefront";
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::InvalidValue {
                key: "STOREFRONT_STORAGE",
                message: format!("unknown backend '{}' (expected postgres or memory)", other),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    /// PostgreSQL schema holding all tables.
    pub schema: String,
    pub bind: SocketAddr,
    pub max_connections: u32,
    pub body_limit: usize,
    pub storage: StorageBackend,
}

impl AppConfig {
    /// Read from process env. `STOREFRONT_*` keys, plus `DATABASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let schema = get("STOREFRONT_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into());
        let ident = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").map_err(|e| ConfigError::InvalidValue {
            key: "STOREFRONT_SCHEMA",
            message: e.to_string(),
        })?;
        if !ident.is_match(&schema) {
            return Err(ConfigError::InvalidSchemaName(schema));
        }

        Ok(AppConfig {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            schema,
            bind: parse_or("STOREFRONT_BIND", get("STOREFRONT_BIND"), DEFAULT_BIND.parse().ok())?,
            max_connections: parse_or(
                "STOREFRONT_MAX_CONNECTIONS",
                get("STOREFRONT_MAX_CONNECTIONS"),
                Some(DEFAULT_MAX_CONNECTIONS),
            )?,
            body_limit: parse_or("STOREFRONT_BODY_LIMIT", get("STOREFRONT_BODY_LIMIT"), Some(DEFAULT_BODY_LIMIT))?,
            storage: match get("STOREFRONT_STORAGE") {
                Some(v) => v.parse()?,
                None => StorageBackend::Postgres,
            },
        })
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: Option<T>) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(v) => v.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            message: format!("'{}': {}", v, e),
        }),
        None => default.ok_or_else(|| ConfigError::InvalidValue {
            key,
            message: "no default".into(),
        }),
    }
}
