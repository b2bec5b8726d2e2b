//! Configuration Module
//!
//! Handles loading and managing server configuration from environment
//! variables. All values are process-lifetime constants supplied at
//! construction.

use std::env;

/// Store configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backing-store connection parameters
    pub db: DbConfig,
    /// Write-back flush interval in seconds; also the age a record must
    /// have been dirty before the periodic loop forces persistence
    pub flush_interval: u64,
    /// Eviction loop interval in seconds; also the idle threshold past
    /// which a clean entry is dropped from memory
    pub evict_interval: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMDB_FLUSH_INTERVAL` - Flush interval in seconds (default: 600)
    /// - `MEMDB_EVICT_INTERVAL` - Eviction interval in seconds (default: 600)
    /// - `MEMDB_PORT` - HTTP server port (default: 3000)
    ///
    /// See [`DbConfig::from_env`] for the connection variables.
    pub fn from_env() -> Self {
        Self {
            db: DbConfig::from_env(),
            flush_interval: env::var("MEMDB_FLUSH_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
            evict_interval: env::var("MEMDB_EVICT_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
            server_port: env::var("MEMDB_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db: DbConfig::default(),
            flush_interval: 600,
            evict_interval: 600,
            server_port: 3000,
        }
    }
}

/// Backing-store connection configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum connection pool size
    pub max_size: usize,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "memdb".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            max_size: 10,
        }
    }
}

impl DbConfig {
    /// Creates a connection configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMDB_DB_HOST` - PostgreSQL host (default: localhost)
    /// - `MEMDB_DB_PORT` - PostgreSQL port (default: 5432)
    /// - `MEMDB_DB_NAME` - Database name (default: memdb)
    /// - `MEMDB_DB_USER` - Database user (default: postgres)
    /// - `MEMDB_DB_PASSWORD` - Database password (default: empty)
    /// - `MEMDB_DB_POOL_SIZE` - Maximum pool size (default: 10)
    pub fn from_env() -> Self {
        Self {
            host: env::var("MEMDB_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("MEMDB_DB_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5432),
            dbname: env::var("MEMDB_DB_NAME").unwrap_or_else(|_| "memdb".to_string()),
            user: env::var("MEMDB_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: env::var("MEMDB_DB_PASSWORD").unwrap_or_default(),
            max_size: env::var("MEMDB_DB_POOL_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }
}
