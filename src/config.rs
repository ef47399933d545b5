//! Server configuration from a TOML file and environment variables.

use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an optional TOML configuration file.
pub const CONFIG_PATH_VAR: &str = "SKYVIEW_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{var} must be {expected}, got '{value}'")]
    InvalidValue {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Per-frame computation budget when streaming (milliseconds)
    pub frame_timeout_ms: u64,
    /// Interval between SSE keep-alive comments (seconds)
    pub keep_alive_secs: u64,
    /// Maximum number of cached frames; 0 disables the cache
    pub cache_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            frame_timeout_ms: 5000,
            keep_alive_secs: 15,
            cache_capacity: 0,
        }
    }
}

impl ServerConfig {
    /// Load configuration.
    ///
    /// # Environment Variables
    /// - `SKYVIEW_CONFIG` (optional): path to a TOML file with the same keys
    /// - `HOST` (default: 0.0.0.0)
    /// - `PORT` (default: 8080)
    /// - `FRAME_TIMEOUT_MS` (default: 5000)
    /// - `SSE_KEEP_ALIVE_SECS` (default: 15)
    /// - `FRAME_CACHE_CAPACITY` (default: 0, disabled)
    ///
    /// Environment variables override file values.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_toml_file(path.trim())?,
            _ => Self::default(),
        };
        base.with_env_overrides(|name| env::var(name).ok())
    }

    /// Defaults overridden by environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides(|name| env::var(name).ok())
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides from a variable lookup.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(value) = lookup("PORT") {
            self.port = parse_var("PORT", "a valid port number", &value)?;
        }
        if let Some(value) = lookup("FRAME_TIMEOUT_MS") {
            self.frame_timeout_ms = parse_var("FRAME_TIMEOUT_MS", "a positive integer", &value)?;
        }
        if let Some(value) = lookup("SSE_KEEP_ALIVE_SECS") {
            self.keep_alive_secs = parse_var("SSE_KEEP_ALIVE_SECS", "a positive integer", &value)?;
        }
        if let Some(value) = lookup("FRAME_CACHE_CAPACITY") {
            self.cache_capacity =
                parse_var("FRAME_CACHE_CAPACITY", "a non-negative integer", &value)?;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                var: "FRAME_TIMEOUT_MS",
                expected: "a positive integer",
                value: "0".to_string(),
            });
        }
        if self.keep_alive_secs == 0 {
            return Err(ConfigError::InvalidValue {
                var: "SSE_KEEP_ALIVE_SECS",
                expected: "a positive integer",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn frame_timeout(&self) -> Duration {
        Duration::from_millis(self.frame_timeout_ms)
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }
}

fn parse_var<T: std::str::FromStr>(
    var: &'static str,
    expected: &'static str,
    value: &str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        expected,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default().with_env_overrides(lookup(&[])).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.frame_timeout(), Duration::from_secs(5));
        assert_eq!(config.keep_alive(), Duration::from_secs(15));
        assert_eq!(config.cache_capacity, 0);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::default()
            .with_env_overrides(lookup(&[
                ("HOST", "127.0.0.1"),
                ("PORT", "3000"),
                ("FRAME_TIMEOUT_MS", "250"),
                ("FRAME_CACHE_CAPACITY", "4096"),
            ]))
            .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.frame_timeout_ms, 250);
        assert_eq!(config.cache_capacity, 4096);
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::default()
            .with_env_overrides(lookup(&[("PORT", "not-a-port")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "PORT must be a valid port number, got 'not-a-port'"
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = ServerConfig::default()
            .with_env_overrides(lookup(&[("FRAME_TIMEOUT_MS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "FRAME_TIMEOUT_MS", .. }));
    }

    #[test]
    fn test_partial_toml() {
        let config: ServerConfig = toml::from_str("port = 9000\ncache_capacity = 10\n").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.cache_capacity, 10);
        assert_eq!(config.host, "0.0.0.0");
    }
}
