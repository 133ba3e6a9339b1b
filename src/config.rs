//! Configuration - request context defaults, preview and logging settings
//!
//! Read from `~/.oxyde/config.yaml` unless an explicit path is given. Every
//! setting has a default so the file may be partial or absent.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_API_VERSION, DEFAULT_PREVIEW_PORT, DEFAULT_TIMEOUT_SECS};
use crate::error::Result;
use crate::rest::AuthType;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root URL of the tested API
    pub url: String,
    /// API version substituted for `{apiVersion}` in request paths
    pub version: String,
    /// Log request and response details at info level
    pub verbose: bool,
    pub user_name: String,
    pub role_name: String,
    pub auth: AuthType,
    pub timeout_secs: u64,
    pub preview_port: u16,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            url: String::new(),
            version: String::from(DEFAULT_API_VERSION),
            verbose: false,
            user_name: String::new(),
            role_name: String::new(),
            auth: AuthType::None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            preview_port: DEFAULT_PREVIEW_PORT,
            log: LogConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Maximum level: error, warn, info, debug or trace
    pub level: String,
    /// Log file, standard output when absent
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: String::from("info"),
            file: None,
        }
    }
}

impl Config {
    /// Default location of the configuration file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".oxyde")
            .join("config.yaml")
    }

    /// Loads the configuration from the default location, defaults when missing
    pub fn load_default() -> Result<Config> {
        let path = Config::default_path();
        if !path.exists() {
            return Ok(Config::default());
        }
        Config::load(&path)
    }

    pub fn load(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)?;
        Config::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Config> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = Config::from_yaml("url: http://localhost:8080\nverbose: true\n").unwrap();
        assert_eq!(config.url, "http://localhost:8080");
        assert!(config.verbose);
        assert_eq!(config.version, "v1");
        assert_eq!(config.preview_port, 16100);
        assert_eq!(config.auth, AuthType::None);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_auth_settings() {
        let yaml = "auth: !Basic\n  username: john\n  password: secret\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(
            config.auth,
            AuthType::Basic {
                username: "john".into(),
                password: "secret".into()
            }
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = Config {
            url: "http://api.local".into(),
            auth: AuthType::Bearer("token".into()),
            ..Config::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        assert!(Config::from_yaml("preview_port: [1, 2]").is_err());
    }
}
