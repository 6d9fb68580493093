//! Runtime configuration read from the environment.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

pub const HTTP_ADDR_VAR: &str = "DASHBOARD_HTTP_ADDR";
pub const DATABASE_VAR: &str = "DASHBOARD_DATABASE";
pub const LOCATION_VAR: &str = "DASHBOARD_LOCATION";
pub const SEED_VAR: &str = "DASHBOARD_SEED_SAMPLE_DATA";

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_DATABASE: &str = "dashboard.db";
pub const DEFAULT_LOCATION: &str = "Shenzhen, China";
const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}='{value}' is not a valid socket address: {source}")]
    InvalidAddr {
        key: &'static str,
        value: String,
        source: AddrParseError,
    },
    #[error("{key}='{value}' is not a boolean (expected true/false/1/0)")]
    InvalidFlag { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    InMemory,
    File(PathBuf),
}

impl DatabaseLocation {
    pub fn parse(value: &str) -> Self {
        if value.trim() == IN_MEMORY_DATABASE {
            DatabaseLocation::InMemory
        } else {
            DatabaseLocation::File(PathBuf::from(value.trim()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub http_addr: SocketAddr,
    pub database: DatabaseLocation,
    /// Display name attached to the generated weather.
    pub location: String,
    pub seed_sample_data: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            database: DatabaseLocation::File(PathBuf::from(DEFAULT_DATABASE)),
            location: DEFAULT_LOCATION.to_string(),
            seed_sample_data: true,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unset or blank keys take
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let addr_text = read(HTTP_ADDR_VAR).unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let http_addr = addr_text
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidAddr {
                key: HTTP_ADDR_VAR,
                value: addr_text.clone(),
                source,
            })?;

        let database = read(DATABASE_VAR)
            .map(|value| DatabaseLocation::parse(&value))
            .unwrap_or_else(|| DatabaseLocation::File(PathBuf::from(DEFAULT_DATABASE)));

        let location = read(LOCATION_VAR).unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        let seed_sample_data = match read(SEED_VAR) {
            Some(value) => parse_flag(SEED_VAR, &value)?,
            None => true,
        };

        Ok(Self {
            http_addr,
            database,
            location,
            seed_sample_data,
        })
    }

    /// In-memory database without sample data.
    pub fn testing() -> Self {
        Self {
            http_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            database: DatabaseLocation::InMemory,
            seed_sample_data: false,
            ..Self::default()
        }
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: value.to_string(),
        }),
    }
}
