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

//! Authenticated HTTP source for the management API

use crate::domain::{ApiConfig, DomainError, SourceError};
use crate::ports::JsonSource;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::ACCEPT;
use reqwest::{Certificate, Client, StatusCode, Url};
use serde_json::Value;
use std::io::ErrorKind;
use std::time::Duration;

/// HTTP source that sends basic-auth GET requests to the API
pub struct HttpJsonSource {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
    /// Additional attempts after a transient failure
    retry_count: u32,
    /// Delay unit between attempts, multiplied by the attempt number
    backoff: Duration,
}

impl HttpJsonSource {
    /// Create a new HTTP source
    ///
    /// # Arguments
    /// * `api` - API section of the configuration
    ///
    /// Fails with `ConfigInvalid` when no usable base URL is configured or the
    /// certificate bundle cannot be read.
    pub fn new(api: &ApiConfig) -> Result<Self, DomainError> {
        if api.url.trim().is_empty() {
            return Err(DomainError::ConfigInvalid(
                "api.url is required to query the API".to_string(),
            ));
        }
        let base_url = Url::parse(&api.url).map_err(|e| {
            DomainError::ConfigInvalid(format!("Unable to parse api.url {}: {}", api.url, e))
        })?;

        let mut builder = Client::builder().timeout(Duration::from_secs(api.timeout_secs));
        if let Some(cert) = load_extra_root(&api.certfile)? {
            builder = builder.add_root_certificate(cert);
        }
        let client = builder.build().map_err(|e| {
            DomainError::ConfigInvalid(format!("Failed to create HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            base_url,
            username: api.username.clone(),
            password: api.password.clone(),
            retry_count: api.retry_count,
            backoff: Duration::from_millis(250),
        })
    }

    /// Override the delay unit between attempts
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Full URL for a resource below the base URL
    pub fn endpoint(&self, resource: &str) -> Result<Url, SourceError> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(resource.trim_start_matches('/')).map_err(|e| {
            SourceError::NetworkFailed(format!(
                "Unable to construct URL from {} and {}: {}",
                self.base_url, resource, e
            ))
        })
    }

    async fn fetch_with_retry(&self, url: &Url) -> Result<Value, SourceError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(document) => return Ok(document),
                Err(e) if e.is_transient() && attempt < self.retry_count => {
                    attempt += 1;
                    let delay = self.backoff * attempt;
                    warn!("Request to {url} failed on attempt {attempt}: {e}, retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &Url) -> Result<Value, SourceError> {
        debug!("GET {url}");
        let mut request = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json");
        if !self.username.is_empty() {
            request = request.basic_auth(&self.username, Some(&self.password));
        }

        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SourceError::AuthenticationFailed(status.as_u16()));
        }
        if !status.is_success() {
            return Err(SourceError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&body)
            .map_err(|e| SourceError::InvalidJson(format!("{url}: {e}")))
    }
}

fn transport_error(e: reqwest::Error) -> SourceError {
    if e.is_timeout() {
        SourceError::Timeout(e.to_string())
    } else {
        SourceError::NetworkFailed(e.to_string())
    }
}

/// Read an extra trust root. A missing file or an unparsable bundle only
/// means the built-in roots are used.
fn load_extra_root(certfile: &str) -> Result<Option<Certificate>, DomainError> {
    if certfile.is_empty() {
        return Ok(None);
    }
    let pem = match std::fs::read(certfile) {
        Ok(pem) => pem,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No additional certificates imported from {certfile}");
            return Ok(None);
        }
        Err(e) => {
            return Err(DomainError::ConfigInvalid(format!(
                "Cannot read certificate bundle {certfile}: {e}"
            )))
        }
    };
    match Certificate::from_pem(&pem) {
        Ok(cert) => Ok(Some(cert)),
        Err(e) => {
            warn!("Cert import from {certfile} failed: {e}. Proceeding with default CAs.");
            Ok(None)
        }
    }
}

#[async_trait]
impl JsonSource for HttpJsonSource {
    async fn fetch(&self, resource: &str) -> Result<Value, SourceError> {
        let url = self.endpoint(resource)?;
        self.fetch_with_retry(&url).await
    }

    fn describe(&self) -> String {
        format!("API {}", self.base_url)
    }
}
