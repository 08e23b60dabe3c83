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

use crate::domain::{DomainError, ElementError};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sentinel used when no CPU pattern matches
pub const UNKNOWN_CPU: &str = "Unk";

/// One row of the inventory listing
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SystemRecord {
    /// Service tag, always non-empty
    pub sku: String,
    /// Lower-cased host name, shortened unless FQDN output is requested
    pub hostname: String,
    /// Chassis model
    pub model: String,
    /// Number of processors
    pub cpu_count: i64,
    /// Processor family (e.g. "Xeon") or "Unk"
    pub cpu_family: String,
    /// Processor model code (e.g. "6258") or "Unk"
    pub cpu_model: String,
    /// Installed memory in GiB
    pub memory_gib: i64,
}

/// One warranty line item, serialized as-is into the export file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct WarrantyRecord {
    pub device_identifier: String,
    pub device_name: String,
    pub device_model: String,
    /// Epoch seconds
    pub start_date: i64,
    /// Epoch seconds
    pub end_date: i64,
    pub description: String,
}

/// An element that was skipped, with its position in the `value` array
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedElement {
    pub index: usize,
    pub error: ElementError,
}

/// Result of one pass over a response's elements
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutcome<T> {
    /// Retained records, in input order
    pub records: Vec<T>,
    /// One entry per skipped element, in input order
    pub dropped: Vec<DroppedElement>,
}

impl<T> BuildOutcome<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            dropped: Vec::new(),
        }
    }

    /// Number of elements examined
    pub fn total(&self) -> usize {
        self.records.len() + self.dropped.len()
    }
}

impl<T> Default for BuildOutcome<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings the record pipeline needs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportConfig {
    /// Emit fully-qualified host names
    pub fqdn: bool,
}

/// Complete on-disk configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub source: SourceConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

/// Connection details for the management API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://ome.example.com`
    pub url: String,
    pub username: String,
    pub password: String,
    /// Extra PEM bundle to trust
    pub certfile: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Additional attempts after a transient failure
    pub retry_count: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            password: String::new(),
            certfile: String::new(),
            timeout_secs: 30,
            retry_count: 2,
        }
    }
}

/// Optional cached snapshots used instead of the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Snapshot of the systems listing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub systems_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<LevelFilter, DomainError> {
        LevelFilter::from_str(&self.level).map_err(|_| {
            DomainError::ConfigInvalid(format!("unknown log level: {}", self.level))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination of the warranty export
    pub filename: String,
    /// Emit fully-qualified host names in the inventory listing
    pub fqdn: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename: "warranty.json".to_string(),
            fqdn: false,
        }
    }
}

impl AppConfig {
    /// Check values that serde cannot check on its own
    pub fn validate(&self) -> Result<(), DomainError> {
        self.logging.level_filter()?;
        if self.output.filename.trim().is_empty() {
            return Err(DomainError::ConfigInvalid(
                "output.filename must not be empty".to_string(),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(DomainError::ConfigInvalid(
                "api.timeout_secs must be at least 1".to_string(),
            ));
        }
        if !self.api.url.is_empty() {
            let url = reqwest::Url::parse(&self.api.url).map_err(|e| {
                DomainError::ConfigInvalid(format!("api.url {:?} is not a URL: {}", self.api.url, e))
            })?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(DomainError::ConfigInvalid(format!(
                    "api.url must use http or https, got {}",
                    url.scheme()
                )));
            }
        }
        Ok(())
    }

    /// Pipeline settings derived from this configuration
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            fqdn: self.output.fqdn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warranty_record_keys() {
        let record = WarrantyRecord {
            device_identifier: "D1".to_string(),
            device_name: "srv1".to_string(),
            device_model: "M1".to_string(),
            start_date: 1640995200,
            end_date: 1672531200,
            description: "Gold".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"DeviceIdentifier":"D1","DeviceName":"srv1","DeviceModel":"M1","StartDate":1640995200,"EndDate":1672531200,"Description":"Gold"}"#
        );
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.output.filename, "warranty.json");
        assert!(!config.report_config().fqdn);
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let mut config = AppConfig::default();
        config.logging.level = "breakit".to_string();
        assert!(matches!(
            config.validate(),
            Err(DomainError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_api_url_checked() {
        let mut config = AppConfig::default();
        config.api.url = "https://ome.example.com".to_string();
        assert!(config.validate().is_ok());

        config.api.url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api.url = "ftp://ome.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = AppConfig::default();
        config.api.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(DomainError::ConfigInvalid(_))
        ));

        config.api.timeout_secs = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_output_filename_rejected() {
        let mut config = AppConfig::default();
        config.output.filename = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
