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

//! Dependency injection container for report services

use crate::adapters::{FileJsonSource, FileSystemRepository, HttpJsonSource};
use crate::domain::{AppConfig, DomainError, OmeReportService, ReportConfig};
use crate::ports::{ConfigurationProvider, FileRepository, JsonSource, OmeReportingService};
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;

/// Run-specific overrides layered on top of the configuration file
#[derive(Debug, Clone, Default)]
pub struct ContainerConfig {
    /// Serve both listings from this snapshot instead of the API
    pub input_override: Option<PathBuf>,
    /// Write the warranty export here instead of `output.filename`
    pub output_override: Option<PathBuf>,
    /// Force fully-qualified host names
    pub force_fqdn: bool,
}

/// Simple configuration provider implementation
pub struct SimpleConfigurationProvider {
    config: AppConfig,
}

impl SimpleConfigurationProvider {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl ConfigurationProvider for SimpleConfigurationProvider {
    async fn load_config(&self) -> Result<AppConfig, DomainError> {
        self.config.validate()?;
        Ok(self.config.clone())
    }
}

/// Dependency injection container
pub struct ServiceContainer {
    app_config: AppConfig,
    config: ContainerConfig,
}

impl ServiceContainer {
    /// Create a new service container
    pub fn new(app_config: AppConfig, config: ContainerConfig) -> Self {
        Self { app_config, config }
    }

    /// Build a container from whatever a configuration provider yields
    pub async fn from_provider(
        provider: &dyn ConfigurationProvider,
        config: ContainerConfig,
    ) -> Result<Self, DomainError> {
        Ok(Self::new(provider.load_config().await?, config))
    }

    pub fn app_config(&self) -> &AppConfig {
        &self.app_config
    }

    /// Pipeline settings after command-line overrides
    pub fn report_config(&self) -> ReportConfig {
        let mut report_config = self.app_config.report_config();
        report_config.fqdn |= self.config.force_fqdn;
        report_config
    }

    /// Destination of the warranty export
    pub fn warranty_output_path(&self) -> PathBuf {
        self.config
            .output_override
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.app_config.output.filename))
    }

    /// Source for the systems listing: `--input`, then `source.systems_file`, then the API
    pub fn create_inventory_source(&self) -> Result<Arc<dyn JsonSource>, DomainError> {
        let snapshot = self
            .config
            .input_override
            .clone()
            .or_else(|| self.app_config.source.systems_file.as_ref().map(PathBuf::from));
        self.create_source(snapshot)
    }

    /// Source for the warranty listing: `--input`, then the API
    pub fn create_warranty_source(&self) -> Result<Arc<dyn JsonSource>, DomainError> {
        self.create_source(self.config.input_override.clone())
    }

    fn create_source(&self, snapshot: Option<PathBuf>) -> Result<Arc<dyn JsonSource>, DomainError> {
        let source: Arc<dyn JsonSource> = match snapshot {
            Some(path) => Arc::new(FileJsonSource::new(path)),
            None => Arc::new(HttpJsonSource::new(&self.app_config.api)?),
        };
        debug!("Using {}", source.describe());
        Ok(source)
    }

    /// Create the export repository
    pub fn create_file_repository(&self) -> Arc<dyn FileRepository> {
        Arc::new(FileSystemRepository::new())
    }

    /// Create the inventory reporting service
    ///
    /// Only the inventory source is constructed, so an inventory run from a
    /// snapshot never needs API settings.
    pub fn create_inventory_service(&self) -> Result<Arc<dyn OmeReportingService>, DomainError> {
        let source = self.create_inventory_source()?;
        Ok(self.assemble(source.clone(), source))
    }

    /// Create the warranty reporting service
    pub fn create_warranty_service(&self) -> Result<Arc<dyn OmeReportingService>, DomainError> {
        let source = self.create_warranty_source()?;
        Ok(self.assemble(source.clone(), source))
    }

    fn assemble(
        &self,
        inventory_source: Arc<dyn JsonSource>,
        warranty_source: Arc<dyn JsonSource>,
    ) -> Arc<dyn OmeReportingService> {
        Arc::new(OmeReportService::new(
            inventory_source,
            warranty_source,
            self.create_file_repository(),
            self.report_config(),
        ))
    }
}

/// Builder pattern for container configuration
pub struct ContainerConfigBuilder {
    config: ContainerConfig,
}

impl ContainerConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
        }
    }

    /// Read responses from a local snapshot
    pub fn input(mut self, path: Option<PathBuf>) -> Self {
        self.config.input_override = path;
        self
    }

    /// Override the warranty export destination
    pub fn output(mut self, path: Option<PathBuf>) -> Self {
        self.config.output_override = path;
        self
    }

    /// Force fully-qualified host names
    pub fn force_fqdn(mut self, fqdn: bool) -> Self {
        self.config.force_fqdn = fqdn;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ContainerConfig {
        self.config
    }
}

impl Default for ContainerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_builder() {
        let config = ContainerConfigBuilder::new()
            .input(Some(PathBuf::from("systems.json")))
            .output(Some(PathBuf::from("out.json")))
            .force_fqdn(true)
            .build();

        assert_eq!(config.input_override, Some(PathBuf::from("systems.json")));
        assert_eq!(config.output_override, Some(PathBuf::from("out.json")));
        assert!(config.force_fqdn);
    }

    #[test]
    fn test_fqdn_flag_is_ored() {
        let mut app = AppConfig::default();
        let container = ServiceContainer::new(app.clone(), ContainerConfig::default());
        assert!(!container.report_config().fqdn);

        let forced = ContainerConfigBuilder::new().force_fqdn(true).build();
        assert!(ServiceContainer::new(app.clone(), forced).report_config().fqdn);

        app.output.fqdn = true;
        assert!(ServiceContainer::new(app, ContainerConfig::default()).report_config().fqdn);
    }

    #[test]
    fn test_output_path() {
        let container = ServiceContainer::new(AppConfig::default(), ContainerConfig::default());
        assert_eq!(container.warranty_output_path(), PathBuf::from("warranty.json"));

        let config = ContainerConfigBuilder::new()
            .output(Some(PathBuf::from("/tmp/w.json")))
            .build();
        let container = ServiceContainer::new(AppConfig::default(), config);
        assert_eq!(container.warranty_output_path(), PathBuf::from("/tmp/w.json"));
    }

    #[test]
    fn test_api_source_needs_url() {
        let container = ServiceContainer::new(AppConfig::default(), ContainerConfig::default());
        assert!(matches!(
            container.create_warranty_service(),
            Err(DomainError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_snapshot_sources_skip_api_settings() {
        let mut app = AppConfig::default();
        app.source.systems_file = Some("systems.json".to_string());
        let container = ServiceContainer::new(app, ContainerConfig::default());
        let source = container.create_inventory_source().unwrap();
        assert!(source.describe().contains("systems.json"));
        // Warranty still needs the API
        assert!(container.create_warranty_source().is_err());

        let config = ContainerConfigBuilder::new()
            .input(Some(PathBuf::from("snapshot.json")))
            .build();
        let container = ServiceContainer::new(AppConfig::default(), config);
        assert!(container
            .create_warranty_source()
            .unwrap()
            .describe()
            .contains("snapshot.json"));
    }

    #[tokio::test]
    async fn test_end_to_end_inventory_from_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("systems.json");
        std::fs::write(
            &path,
            r#"{"value": [{"SKU": "ABC123", "Name": "host1.example.com"}, {"Name": "orphan"}]}"#,
        )
        .unwrap();

        let config = ContainerConfigBuilder::new().input(Some(path)).build();
        let container = ServiceContainer::new(AppConfig::default(), config);
        let service = container.create_inventory_service().unwrap();
        let outcome = service.collect_inventory().await.unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].hostname, "host1");
        assert_eq!(outcome.dropped[0].index, 1);
    }

    #[tokio::test]
    async fn test_simple_provider_validates() {
        let mut app = AppConfig::default();
        app.logging.level = "loud".to_string();
        let provider = SimpleConfigurationProvider::new(app);
        assert!(ServiceContainer::from_provider(&provider, ContainerConfig::default())
            .await
            .is_err());
    }
}
