use std::env;
use std::net::SocketAddr;

use strum::{Display, EnumString};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse environment variable '{key}': {details}")]
    Parse { key: String, details: String },
}

/// Which store backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreKind {
    Mongo,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    pub bind_addr: SocketAddr,
    pub api_prefix: String,
    pub store: StoreKind,
    pub mongodb_url: String,
    pub database_name: String,
    pub todos_collection: String,
    pub users_collection: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Todo API".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            api_prefix: "/api/v1".to_string(),
            store: StoreKind::Mongo,
            mongodb_url: "mongodb://localhost:27017".to_string(),
            database_name: "todo_app".to_string(),
            todos_collection: "todos".to_string(),
            users_collection: "users".to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from the environment, falling back to defaults for
    /// unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            app_name: env_or("APP_NAME", defaults.app_name),
            app_version: env_or("APP_VERSION", defaults.app_version),
            bind_addr: env_parse("BIND_ADDR", defaults.bind_addr)?,
            api_prefix: env_or("API_PREFIX", defaults.api_prefix),
            store: env_parse("STORE", defaults.store)?,
            mongodb_url: env_or("MONGODB_URL", defaults.mongodb_url),
            database_name: env_or("DATABASE_NAME", defaults.database_name),
            todos_collection: env_or("TODOS_COLLECTION", defaults.todos_collection),
            users_collection: env_or("USERS_COLLECTION", defaults.users_collection),
        })
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Parse {
            key: key.to_string(),
            details: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
