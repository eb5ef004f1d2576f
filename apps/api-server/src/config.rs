//! API server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::time::Duration;

use luna_db::DbConfig;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,

    /// Listen port
    pub port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Connection pool size
    pub db_max_connections: u32,

    /// How long a request waits for a pooled connection
    pub db_acquire_timeout: Duration,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            bind_addr: env::var("LUNA_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("LUNA_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("LUNA_PORT".to_string()))?,

            database_path: env::var("LUNA_DATABASE_PATH")
                .unwrap_or_else(|_| "lunadine.db".to_string()),

            db_max_connections: env::var("LUNA_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("LUNA_DB_MAX_CONNECTIONS".to_string()))?,

            db_acquire_timeout: env::var("LUNA_DB_ACQUIRE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| {
                    ConfigError::InvalidValue("LUNA_DB_ACQUIRE_TIMEOUT_SECS".to_string())
                })?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "LUNA_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.db_max_connections)
            .connect_timeout(self.db_acquire_timeout)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_config_carries_pool_settings() {
        let config = ServerConfig {
            bind_addr: "127.0.0.1".to_string(),
            port: 9000,
            database_path: "test.db".to_string(),
            db_max_connections: 3,
            db_acquire_timeout: Duration::from_secs(7),
        };

        assert_eq!(config.bind_address(), "127.0.0.1:9000");

        let db = config.db_config();
        assert_eq!(db.max_connections, 3);
        assert_eq!(db.connect_timeout, Duration::from_secs(7));
        assert!(db.run_migrations);
    }
}
