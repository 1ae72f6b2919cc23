//! Configuration file
//!
//! A JSON object; every field is optional:
//!
//! ```json
//! {
//!   "data_file": "requirements_data.json",
//!   "host": "localhost",
//!   "port": 8000,
//!   "cors_origins": []
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;

use super::args::ConfigArgs;
use super::errors::{CliError, CliResult};

/// Resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backing JSON document
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    #[serde(flatten)]
    pub server: HttpServerConfig,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("requirements_data.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            server: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// File (if given) plus command-line overrides
    pub fn resolve(args: &ConfigArgs) -> CliResult<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(data_file) = &args.data_file {
            config.data_file = data_file.clone();
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(CliError::config_error("data_file must not be empty"));
        }
        if self.server.host.trim().is_empty() {
            return Err(CliError::config_error("host must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::resolve(&ConfigArgs::default()).unwrap();
        assert_eq!(config.data_file, PathBuf::from("requirements_data.json"));
        assert_eq!(config.server.socket_addr(), "localhost:8000");
    }

    #[test]
    fn test_load_flattened_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("reqai.json");
        fs::write(
            &path,
            r#"{"data_file": "/srv/reqs.json", "port": 9100, "cors_origins": ["http://a.example"]}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.data_file, PathBuf::from("/srv/reqs.json"));
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.cors_origins, vec!["http://a.example".to_string()]);
    }

    #[test]
    fn test_data_file_override() {
        let args = ConfigArgs {
            config: None,
            data_file: Some(PathBuf::from("other.json")),
        };
        let config = Config::resolve(&args).unwrap();
        assert_eq!(config.data_file, PathBuf::from("other.json"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = Config::load(&tmp.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code_str(), "REQAI_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_invalid_json_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, "{ port: ").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_empty_host_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("c.json");
        fs::write(&path, r#"{"host": " "}"#).unwrap();
        assert!(Config::load(&path).is_err());
    }
}
