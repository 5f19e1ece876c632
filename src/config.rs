use std::{fs::File, io::BufReader};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::geocode::{DEFAULT_OPTION_KEY, GOOGLE_GEOCODE_ENDPOINT};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub geocode: GeocodeConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8006,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn listen(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeocodeConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Settings key holding the address -> coordinates map
    #[serde(default = "default_option_key")]
    pub option_key: String,
}

fn default_endpoint() -> String {
    GOOGLE_GEOCODE_ENDPOINT.to_string()
}

fn default_option_key() -> String {
    DEFAULT_OPTION_KEY.to_string()
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_endpoint(),
            option_key: default_option_key(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SettingsConfig {
    pub backend: String,
    #[serde(default)]
    pub url: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            backend: "inmem".to_string(),
            url: String::new(),
        }
    }
}

impl Config {
    pub fn read(path: &str) -> anyhow::Result<Self> {
        let file = File::open(path)
            .map_err(|e| anyhow::anyhow!("Failed to open config file {}: {}", path, e))?;
        let reader = BufReader::new(file);
        let config: Config = serde_yaml::from_reader(reader)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file {}: {}", path, e))?;
        let config = config.postprocess();
        Ok(config)
    }

    // "$NAME" values are taken from the environment
    fn postprocess(mut self) -> Self {
        self.geocode.api_key = expand_env(&self.geocode.api_key);
        self.settings.url = expand_env(&self.settings.url);
        self
    }

    pub fn empty() -> Self {
        Self {
            debug: false,
            server: ServerConfig::default(),
            geocode: GeocodeConfig::default(),
            settings: SettingsConfig::default(),
        }
    }
}

fn expand_env(value: &str) -> String {
    let Some(name) = value.strip_prefix('$') else {
        return value.to_string();
    };
    match std::env::var(name) {
        Ok(value) => value,
        Err(_) => {
            warn!("Environment variable {} is not set", name);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_empty() {
        let config = Config::empty();
        assert_eq!(config.debug, false);
        assert_eq!(config.server.port, 8006);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.settings.backend, "inmem");
        assert_eq!(config.geocode.option_key, "wplook_map_coordinates");
        assert_eq!(
            config.geocode.endpoint,
            "https://maps.googleapis.com/maps/api/geocode/json"
        );
    }

    #[test]
    fn test_config_from_file() {
        let temp_file = NamedTempFile::new().unwrap();
        let config_path = temp_file.path().to_str().unwrap();
        fs::write(
            config_path,
            r#"
debug: true
server:
  port: 9000
  host: "127.0.0.1"
geocode:
  api_key: "abc123"
settings:
  backend: "sqlite"
  url: "sqlite://options.db"
"#,
        )
        .unwrap();

        let config = Config::read(config_path).unwrap();
        assert_eq!(config.debug, true);
        assert_eq!(config.server.listen(), "127.0.0.1:9000");
        assert_eq!(config.geocode.api_key, "abc123");
        assert_eq!(config.geocode.option_key, "wplook_map_coordinates");
        assert_eq!(config.settings.backend, "sqlite");
        assert_eq!(config.settings.url, "sqlite://options.db");
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        let config_path = temp_file.path().to_str().unwrap();
        fs::write(config_path, "debug: false\n").unwrap();

        let config = Config::read(config_path).unwrap();
        assert_eq!(config.server.port, 8006);
        assert_eq!(config.settings.backend, "inmem");
        assert_eq!(config.geocode.api_key, "");
    }

    #[test]
    fn test_config_api_key_from_env() {
        std::env::set_var("MAPCACHE_TEST_API_KEY", "from-env");
        let temp_file = NamedTempFile::new().unwrap();
        let config_path = temp_file.path().to_str().unwrap();
        fs::write(
            config_path,
            "geocode:\n  api_key: \"$MAPCACHE_TEST_API_KEY\"\n",
        )
        .unwrap();

        let config = Config::read(config_path).unwrap();
        assert_eq!(config.geocode.api_key, "from-env");
    }

    #[test]
    fn test_config_missing_file() {
        assert!(Config::read("/nonexistent/mapcache.yaml").is_err());
    }
}
