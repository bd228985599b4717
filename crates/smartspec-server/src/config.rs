//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use smartspec_geometry::{EstimatorConfig, GeometryError};
use thiserror::Error;

/// Default cap on upload size: 50 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 50 * 1024 * 1024;

/// Configuration errors. All of them are fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An environment variable held an unparseable value.
    #[error("{var} must be {expected}, got {value:?}")]
    InvalidVar {
        /// Variable name.
        var: &'static str,
        /// What was expected.
        expected: &'static str,
        /// The raw value.
        value: String,
    },

    /// The estimator config file could not be read.
    #[error("Failed to read estimator config {path}: {source}")]
    Read {
        /// Path of the file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The estimator config file is not valid TOML for [`EstimatorConfig`].
    #[error("Failed to parse estimator config {path}: {source}")]
    Parse {
        /// Path of the file.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },

    /// The estimator config values are out of range.
    #[error(transparent)]
    Estimator(#[from] GeometryError),

    /// Host and port do not form a socket address.
    #[error("Invalid listen address {0}")]
    Address(String),
}

/// Settings for `smartspec-server`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Listen host (`SMARTSPEC_HOST`).
    pub host: String,
    /// Listen port (`SMARTSPEC_PORT`).
    pub port: u16,
    /// Directory holding uploads (`SMARTSPEC_UPLOAD_DIR`).
    pub upload_dir: PathBuf,
    /// Largest upload that will be read (`SMARTSPEC_MAX_FILE_BYTES`).
    pub max_file_bytes: u64,
    /// Estimator tuning, from the TOML file named by
    /// `SMARTSPEC_ESTIMATOR_CONFIG`.
    pub estimator: EstimatorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            upload_dir: PathBuf::from("./uploads"),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            estimator: EstimatorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("SMARTSPEC_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("SMARTSPEC_PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidVar {
                var: "SMARTSPEC_PORT",
                expected: "a valid port number",
                value: port,
            })?;
        }
        if let Some(dir) = lookup("SMARTSPEC_UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(dir);
        }
        if let Some(max) = lookup("SMARTSPEC_MAX_FILE_BYTES") {
            config.max_file_bytes = max.trim().parse().map_err(|_| ConfigError::InvalidVar {
                var: "SMARTSPEC_MAX_FILE_BYTES",
                expected: "a byte count",
                value: max,
            })?;
        }
        if let Some(path) = lookup("SMARTSPEC_ESTIMATOR_CONFIG") {
            config.estimator = load_estimator_config(Path::new(&path))?;
        }

        Ok(config)
    }

    /// Address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::Address(addr))
    }
}

/// Load and validate an [`EstimatorConfig`] TOML file.
pub fn load_estimator_config(path: &Path) -> Result<EstimatorConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: EstimatorConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.max_file_bytes, 50 * 1024 * 1024);
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("SMARTSPEC_HOST", "127.0.0.1"),
            ("SMARTSPEC_PORT", "9000"),
            ("SMARTSPEC_UPLOAD_DIR", "/srv/cad"),
            ("SMARTSPEC_MAX_FILE_BYTES", "1024"),
        ]))
        .unwrap();
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:9000");
        assert_eq!(config.upload_dir, PathBuf::from("/srv/cad"));
        assert_eq!(config.max_file_bytes, 1024);
    }

    #[test]
    fn test_bad_port() {
        let err = ServerConfig::from_lookup(lookup(&[("SMARTSPEC_PORT", "eighty")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidVar {
                var: "SMARTSPEC_PORT",
                ..
            }
        ));
    }

    #[test]
    fn test_estimator_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estimator.toml");
        std::fs::write(&path, "fill_fraction = 0.5\n").unwrap();

        let config = ServerConfig::from_lookup(lookup(&[(
            "SMARTSPEC_ESTIMATOR_CONFIG",
            path.to_str().unwrap(),
        )]))
        .unwrap();
        assert_eq!(config.estimator.fill_fraction, 0.5);
        assert_eq!(
            config.estimator.min_height_clamp,
            smartspec_geometry::MIN_HEIGHT_CLAMP
        );
    }

    #[test]
    fn test_estimator_file_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estimator.toml");
        std::fs::write(&path, "fill_fraction = 2.0\n").unwrap();
        assert!(matches!(
            load_estimator_config(&path),
            Err(ConfigError::Estimator(GeometryError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_estimator_file_missing() {
        assert!(matches!(
            load_estimator_config(Path::new("/nonexistent/estimator.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
