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

//! Local snapshot source for cached API responses

use crate::domain::SourceError;
use crate::ports::JsonSource;
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::path::PathBuf;
use tokio::fs;

/// Serves every resource from one JSON file on disk
pub struct FileJsonSource {
    path: PathBuf,
}

impl FileJsonSource {
    /// Create a new file source
    ///
    /// # Arguments
    /// * `path` - JSON file holding a saved API response
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl JsonSource for FileJsonSource {
    async fn fetch(&self, resource: &str) -> Result<Value, SourceError> {
        debug!("Serving {} from {}", resource, self.path.display());
        let bytes = fs::read(&self.path).await.map_err(|e| SourceError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            SourceError::InvalidJson(format!("{}: {}", self.path.display(), e))
        })
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_reads_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("systems.json");
        std::fs::write(&path, r#"{"value": [{"SKU": "ABC123"}]}"#).unwrap();

        let source = FileJsonSource::new(&path);
        let document = source.fetch("redfish/v1/Systems/Members").await.unwrap();
        assert_eq!(document["value"][0]["SKU"], "ABC123");
        assert!(source.describe().contains("systems.json"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempdir().unwrap();
        let source = FileJsonSource::new(dir.path().join("absent.json"));
        let err = source.fetch("anything").await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = FileJsonSource::new(&path).fetch("x").await.unwrap_err();
        assert!(matches!(err, SourceError::InvalidJson(_)));
    }
}
