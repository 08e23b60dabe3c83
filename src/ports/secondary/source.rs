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

use crate::domain::SourceError;
use async_trait::async_trait;
use serde_json::Value;

/// Secondary port - JSON document source
///
/// Abstracts where API responses come from, so the pipeline does not care
/// whether a response was fetched over HTTP or read from a cached snapshot.
#[async_trait]
pub trait JsonSource: Send + Sync {
    /// Fetch and parse the document for an API resource
    ///
    /// # Arguments
    /// * `resource` - API path relative to the base URL (e.g. `api/WarrantyService/Warranties`)
    ///
    /// # Returns
    /// * `Ok(Value)` - Parsed JSON document
    /// * `Err(SourceError)` - The document could not be obtained
    async fn fetch(&self, resource: &str) -> Result<Value, SourceError>;

    /// Human-readable origin for log messages
    fn describe(&self) -> String;
}
