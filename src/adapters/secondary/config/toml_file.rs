/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! TOML configuration file loader

use crate::domain::{AppConfig, DomainError};
use crate::ports::ConfigurationProvider;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "ome_report.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse TOML in {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("{0}")]
    Validation(DomainError),
}

impl From<ConfigError> for DomainError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation(inner) => inner,
            other => DomainError::ConfigInvalid(other.to_string()),
        }
    }
}

/// Configuration provider backed by a TOML file
pub struct TomlConfigurationProvider {
    path: PathBuf,
}

impl TomlConfigurationProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse and validate configuration text
    pub fn parse(text: &str, origin: &str) -> Result<AppConfig, ConfigError> {
        let config: AppConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;
        config.validate().map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Read, parse and validate the configuration file
    pub async fn load_from_file(&self) -> Result<AppConfig, ConfigError> {
        let origin = self.path.display().to_string();
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ConfigError::Read {
                path: origin.clone(),
                source,
            })?;
        Self::parse(&text, &origin)
    }

    /// TOML rendering of the default configuration
    pub fn example_toml() -> Result<String, DomainError> {
        toml::to_string_pretty(&AppConfig::default())
            .map_err(|e| DomainError::SerializationFailed(format!("TOML serialization failed: {e}")))
    }
}

#[async_trait]
impl ConfigurationProvider for TomlConfigurationProvider {
    async fn load_config(&self) -> Result<AppConfig, DomainError> {
        Ok(self.load_from_file().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
[api]
url = "https://foobar.baz"
username = "user"
password = "password"
certfile = "/foo/file.pem"

[source]
systems_file = "systems.json"

[logging]
level = "trace"

[output]
filename = "/var/lib/ome/warranty.json"
fqdn = true
"#;

    #[test]
    fn test_parse_full_file() {
        let config = TomlConfigurationProvider::parse(SAMPLE, "sample").unwrap();
        assert_eq!(config.api.url, "https://foobar.baz");
        assert_eq!(config.api.username, "user");
        assert_eq!(config.api.certfile, "/foo/file.pem");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.retry_count, 2);
        assert_eq!(config.source.systems_file.as_deref(), Some("systems.json"));
        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.output.filename, "/var/lib/ome/warranty.json");
        assert!(config.output.fqdn);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = TomlConfigurationProvider::parse("", "empty").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = TomlConfigurationProvider::parse("[logging]\nlevel = \"breakit\"\n", "bad")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = TomlConfigurationProvider::parse("[output]\nfqdn = \"yes\"\n", "bad").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_example_round_trips() {
        let text = TomlConfigurationProvider::example_toml().unwrap();
        let config = TomlConfigurationProvider::parse(&text, "example").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn test_load_written_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ome_report.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let provider = TomlConfigurationProvider::new(&path);
        let config = provider.load_config().await.unwrap();
        assert_eq!(config.api.password, "password");
    }

    #[tokio::test]
    async fn test_missing_file_is_config_invalid() {
        let dir = tempdir().unwrap();
        let provider = TomlConfigurationProvider::new(dir.path().join("missing.toml"));
        assert!(matches!(
            provider.load_config().await,
            Err(DomainError::ConfigInvalid(_))
        ));
    }
}
