//! Runtime configuration from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `TODOLIST_DB` | `~/.local/share/todolist/todolist.json` |
//! | `HOST` | `127.0.0.1` |
//! | `PORT` | `5000` |
//! | `TODOLIST_API` | `http://localhost:5000/api` |
//! | `RUST_LOG` | `todolist=info,tower_http=info` |

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::storage::default_db_path;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_LOG_FILTER: &str = "todolist=info,tower_http=info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT='{0}' is not a valid port number")]
    InvalidPort(String),
    #[error("'{0}' is not a valid listen address")]
    InvalidAddress(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub api_url: String,
}

impl Config {
    /// Reads `.env` if present, then the process environment.
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenvy::dotenv().ok();
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            db_path: get("TODOLIST_DB").map(PathBuf::from).unwrap_or_else(default_db_path),
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            api_url: get("TODOLIST_API").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::InvalidAddress(raw))
    }

    /// Log file used while the terminal UI owns the screen; next to the database.
    pub fn log_path(&self) -> PathBuf {
        self.db_path.with_file_name("todolist.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.db_path, default_db_path());
    }

    #[test]
    fn environment_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("HOST", "0.0.0.0"),
            ("TODOLIST_DB", "/tmp/x/db.json"),
            ("TODOLIST_API", "http://example:8080/api"),
        ]))
        .unwrap();
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(config.db_path, PathBuf::from("/tmp/x/db.json"));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/x/todolist.log"));
        assert_eq!(config.api_url, "http://example:8080/api");
    }

    #[test]
    fn bad_port_is_reported() {
        let err = Config::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort("http".into()));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = Config::from_lookup(lookup(&[("PORT", "  ")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }
}
