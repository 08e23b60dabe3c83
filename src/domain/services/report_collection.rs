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

use crate::domain::services::record_builder::{build_system_records, build_warranty_records};
use crate::domain::{BuildOutcome, DomainError, ReportConfig, SystemRecord, WarrantyRecord};
use crate::ports::{FileRepository, JsonSource, OmeReportingService};
use async_trait::async_trait;
use log::info;
use std::path::Path;
use std::sync::Arc;

/// API resource listing managed systems
pub const SYSTEMS_RESOURCE: &str = "redfish/v1/Systems/Members";
/// API resource listing warranty line items
pub const WARRANTY_RESOURCE: &str = "api/WarrantyService/Warranties";

/// Domain service that turns API responses into reports
///
/// Each call is one linear pass: fetch, build records, optionally write.
pub struct OmeReportService {
    /// Source for the systems listing
    inventory_source: Arc<dyn JsonSource>,
    /// Source for the warranty listing
    warranty_source: Arc<dyn JsonSource>,
    /// Destination for warranty exports
    repository: Arc<dyn FileRepository>,
    /// Pipeline settings
    config: ReportConfig,
}

impl OmeReportService {
    /// Create a new report service
    ///
    /// # Arguments
    /// * `inventory_source` - Where the systems listing comes from
    /// * `warranty_source` - Where the warranty listing comes from
    /// * `repository` - Writer for warranty exports
    /// * `config` - Pipeline settings
    pub fn new(
        inventory_source: Arc<dyn JsonSource>,
        warranty_source: Arc<dyn JsonSource>,
        repository: Arc<dyn FileRepository>,
        config: ReportConfig,
    ) -> Self {
        Self {
            inventory_source,
            warranty_source,
            repository,
            config,
        }
    }

    fn log_outcome<T>(kind: &str, outcome: &BuildOutcome<T>) {
        info!(
            "Built {} {kind} records from {} elements ({} skipped)",
            outcome.records.len(),
            outcome.total(),
            outcome.dropped.len()
        );
    }
}

#[async_trait]
impl OmeReportingService for OmeReportService {
    async fn collect_inventory(&self) -> Result<BuildOutcome<SystemRecord>, DomainError> {
        let root = self.inventory_source.fetch(SYSTEMS_RESOURCE).await?;
        let outcome = build_system_records(&root, &self.config);
        Self::log_outcome("system", &outcome);
        Ok(outcome)
    }

    async fn collect_warranty(&self) -> Result<BuildOutcome<WarrantyRecord>, DomainError> {
        let root = self.warranty_source.fetch(WARRANTY_RESOURCE).await?;
        let outcome = build_warranty_records(&root);
        Self::log_outcome("warranty", &outcome);
        Ok(outcome)
    }

    async fn export_warranty(
        &self,
        path: &Path,
    ) -> Result<BuildOutcome<WarrantyRecord>, DomainError> {
        let outcome = self.collect_warranty().await?;
        self.repository
            .save_warranty_json(&outcome.records, path)
            .await?;
        info!(
            "Wrote {} warranty records to {}",
            outcome.records.len(),
            path.display()
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceError;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    struct StaticSource {
        document: Result<Value, SourceError>,
        requested: Mutex<Vec<String>>,
    }

    impl StaticSource {
        fn new(document: Result<Value, SourceError>) -> Arc<Self> {
            Arc::new(Self {
                document,
                requested: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl JsonSource for StaticSource {
        async fn fetch(&self, resource: &str) -> Result<Value, SourceError> {
            self.requested.lock().unwrap().push(resource.to_string());
            self.document.clone()
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    #[derive(Default)]
    struct RecordingRepository {
        saved: Mutex<Vec<(usize, String)>>,
    }

    #[async_trait]
    impl FileRepository for RecordingRepository {
        async fn save_warranty_json(
            &self,
            records: &[WarrantyRecord],
            path: &Path,
        ) -> Result<(), DomainError> {
            self.saved
                .lock()
                .unwrap()
                .push((records.len(), path.display().to_string()));
            Ok(())
        }
    }

    fn warranty_document() -> Value {
        json!({"value": [
            {
                "DeviceIdentifier": "D1",
                "DeviceName": "Srv1",
                "DeviceModel": "M1",
                "StartDate": "2022-01-01 00:00:00.000",
                "EndDate": "2023-01-01 00:00:00.000",
                "ServiceLevelDescription": "Gold"
            },
            {"DeviceIdentifier": "D2", "StartDate": "2022-01-01 00:00:00.000"}
        ]})
    }

    #[tokio::test]
    async fn test_collect_inventory_uses_systems_resource() {
        let source = StaticSource::new(Ok(json!({"value": [{"SKU": "A"}, {"Name": "x"}]})));
        let service = OmeReportService::new(
            source.clone(),
            StaticSource::new(Ok(json!({}))),
            Arc::new(RecordingRepository::default()),
            ReportConfig::default(),
        );

        let outcome = service.collect_inventory().await.unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.dropped.len(), 1);
        assert_eq!(*source.requested.lock().unwrap(), vec![SYSTEMS_RESOURCE]);
    }

    #[tokio::test]
    async fn test_export_warranty_saves_retained_records() {
        let repository = Arc::new(RecordingRepository::default());
        let service = OmeReportService::new(
            StaticSource::new(Ok(json!({}))),
            StaticSource::new(Ok(warranty_document())),
            repository.clone(),
            ReportConfig::default(),
        );

        let outcome = service
            .export_warranty(Path::new("/tmp/warranty.json"))
            .await
            .unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.dropped.len(), 1);
        assert_eq!(
            *repository.saved.lock().unwrap(),
            vec![(1, "/tmp/warranty.json".to_string())]
        );
    }

    #[tokio::test]
    async fn test_source_failure_aborts_without_writing() {
        let repository = Arc::new(RecordingRepository::default());
        let service = OmeReportService::new(
            StaticSource::new(Ok(json!({}))),
            StaticSource::new(Err(SourceError::HttpStatus(500))),
            repository.clone(),
            ReportConfig::default(),
        );

        let result = service.export_warranty(Path::new("out.json")).await;
        assert!(matches!(result, Err(DomainError::SourceUnavailable(_))));
        assert!(repository.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_element_failures_never_escalate() {
        let document = json!({"value": [{}, {"SKU": ""}, {"SKU": null}, 17, "text"]});
        let service = OmeReportService::new(
            StaticSource::new(Ok(document)),
            StaticSource::new(Ok(json!({}))),
            Arc::new(RecordingRepository::default()),
            ReportConfig::default(),
        );

        let outcome = service.collect_inventory().await.unwrap();
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.dropped.len(), 5);
    }
}
