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

use crate::domain::{DomainError, WarrantyRecord};
use async_trait::async_trait;
use std::path::Path;

/// Secondary port - File repository abstraction
///
/// This interface abstracts file-based storage of report exports
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Replace the contents of `path` with the warranty records as a JSON array
    ///
    /// # Arguments
    /// * `records` - Records to export, in order
    /// * `path` - Destination file
    ///
    /// # Returns
    /// * `Ok(())` - File fully written
    /// * `Err(DomainError)` - Nothing was written to `path`
    async fn save_warranty_json(
        &self,
        records: &[WarrantyRecord],
        path: &Path,
    ) -> Result<(), DomainError>;
}
