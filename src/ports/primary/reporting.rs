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

use crate::domain::{BuildOutcome, DomainError, SystemRecord, WarrantyRecord};
use async_trait::async_trait;
use std::path::Path;

/// Primary port - Main interface offered by the reporting domain
///
/// This is what the CLI and library consumers use to produce reports.
/// Run-level failures come back as `Err`; element-level failures are reported
/// in the returned `BuildOutcome` and never turn into `Err`.
#[async_trait]
pub trait OmeReportingService: Send + Sync {
    /// Fetch the systems listing and build inventory records
    ///
    /// # Returns
    /// * `Ok(BuildOutcome<SystemRecord>)` - Retained records and skipped elements
    /// * `Err(DomainError)` - The source was unavailable
    async fn collect_inventory(&self) -> Result<BuildOutcome<SystemRecord>, DomainError>;

    /// Fetch the warranty listing and build warranty records
    ///
    /// # Returns
    /// * `Ok(BuildOutcome<WarrantyRecord>)` - Retained records and skipped elements
    /// * `Err(DomainError)` - The source was unavailable
    async fn collect_warranty(&self) -> Result<BuildOutcome<WarrantyRecord>, DomainError>;

    /// Collect warranty records and write them to `path` as a JSON array
    ///
    /// # Arguments
    /// * `path` - Destination file, replaced on success and untouched on failure
    async fn export_warranty(
        &self,
        path: &Path,
    ) -> Result<BuildOutcome<WarrantyRecord>, DomainError>;
}
