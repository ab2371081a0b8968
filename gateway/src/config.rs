//! Process configuration, read from environment variables.

use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE: &str = "PetBook";
pub const DEFAULT_COLLECTION: &str = "Pets";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Which store backs the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo { uri: String },
    /// Process-local, lost on exit. For demos and tests.
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub database: String,
    pub collection: String,
    pub log_format: LogFormat,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            None => DEFAULT_PORT,
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value })?,
        };

        let store = match lookup("PETBOOK_STORE").as_deref() {
            None | Some("mongo") => StoreBackend::Mongo {
                uri: lookup("MONGODB_URI")
                    .filter(|uri| !uri.is_empty())
                    .ok_or(ConfigError::Missing("MONGODB_URI"))?,
            },
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "PETBOOK_STORE",
                    value: other.to_string(),
                })
            }
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("compact") => LogFormat::Compact,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host,
            port,
            store,
            database: lookup("PETBOOK_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            collection: lookup("PETBOOK_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            log_format,
        })
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[("MONGODB_URI", "mongodb://localhost:27017")]).unwrap();
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
        assert_eq!(config.database, "PetBook");
        assert_eq!(config.collection, "Pets");
        assert_eq!(config.log_format, LogFormat::Compact);
        assert_eq!(
            config.store,
            StoreBackend::Mongo {
                uri: "mongodb://localhost:27017".to_string()
            }
        );
    }

    #[test]
    fn mongo_requires_uri() {
        assert_eq!(config(&[]), Err(ConfigError::Missing("MONGODB_URI")));
        assert_eq!(
            config(&[("MONGODB_URI", "")]),
            Err(ConfigError::Missing("MONGODB_URI"))
        );
    }

    #[test]
    fn memory_store_needs_no_uri() {
        let config = config(&[("PETBOOK_STORE", "memory"), ("PORT", "3000")]).unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert_eq!(
            config(&[("PETBOOK_STORE", "memory"), ("PORT", "http")]),
            Err(ConfigError::Invalid {
                key: "PORT",
                value: "http".to_string()
            })
        );
        assert!(config(&[("PETBOOK_STORE", "redis")]).is_err());
        assert!(config(&[("PETBOOK_STORE", "memory"), ("LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("PETBOOK_STORE", "memory"),
            ("HOST", "127.0.0.1"),
            ("PETBOOK_DATABASE", "Staging"),
            ("PETBOOK_COLLECTION", "Animals"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.socket_addr(), "127.0.0.1:8080");
        assert_eq!(config.database, "Staging");
        assert_eq!(config.collection, "Animals");
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
