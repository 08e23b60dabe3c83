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

//! File-based repository for saving warranty exports

use crate::domain::{render_warranty_json, DomainError, WarrantyRecord};
use crate::ports::FileRepository;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File system repository for report exports
pub struct FileSystemRepository;

impl FileSystemRepository {
    /// Create a new file system repository
    pub fn new() -> Self {
        Self
    }

    /// Sibling path the export is staged in before the final rename
    fn staging_path(path: &Path) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(path.file_name().unwrap_or_default());
        name.push(".tmp");
        path.with_file_name(name)
    }
}

impl Default for FileSystemRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileRepository for FileSystemRepository {
    async fn save_warranty_json(
        &self,
        records: &[WarrantyRecord],
        path: &Path,
    ) -> Result<(), DomainError> {
        let data = render_warranty_json(records)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::WriteFailed(format!("Failed to create directory: {}", e)))?;
        }

        let staging = Self::staging_path(path);
        if let Err(e) = fs::write(&staging, &data).await {
            let _ = fs::remove_file(&staging).await;
            return Err(DomainError::WriteFailed(format!(
                "Failed to write {}: {}",
                staging.display(),
                e
            )));
        }
        if let Err(e) = fs::rename(&staging, path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(DomainError::WriteFailed(format!(
                "Failed to replace {}: {}",
                path.display(),
                e
            )));
        }

        Ok(())
    }
}
