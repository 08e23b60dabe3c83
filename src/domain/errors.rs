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

use std::fmt;

/// Run-level errors. Any of these aborts the whole run.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// The JSON source could not produce a document
    SourceUnavailable(String),
    /// Configuration was malformed or incomplete
    ConfigInvalid(String),
    /// A report could not be serialized
    SerializationFailed(String),
    /// A report could not be written to its destination
    WriteFailed(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::SourceUnavailable(msg) => write!(f, "Source unavailable: {}", msg),
            DomainError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            DomainError::SerializationFailed(msg) => write!(f, "Serialization failed: {}", msg),
            DomainError::WriteFailed(msg) => write!(f, "Write failed: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

/// Errors raised by JSON source adapters (not exposed to the domain)
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// Local file could not be read
    Io { path: String, message: String },
    /// Transport-level failure talking to the API
    NetworkFailed(String),
    /// The API rejected the credentials
    AuthenticationFailed(u16),
    /// The API answered with a non-success status
    HttpStatus(u16),
    /// The payload was not valid JSON
    InvalidJson(String),
    /// The request did not complete in time
    Timeout(String),
}

impl SourceError {
    /// Whether another attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::NetworkFailed(_) | SourceError::Timeout(_) => true,
            SourceError::HttpStatus(code) => *code >= 500,
            _ => false,
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io { path, message } => write!(f, "Cannot read {}: {}", path, message),
            SourceError::NetworkFailed(msg) => write!(f, "Network operation failed: {}", msg),
            SourceError::AuthenticationFailed(code) => {
                write!(f, "Authentication failed with status {}", code)
            }
            SourceError::HttpStatus(code) => write!(f, "status error: {}", code),
            SourceError::InvalidJson(msg) => write!(f, "Invalid JSON: {}", msg),
            SourceError::Timeout(msg) => write!(f, "Timeout: {}", msg),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<SourceError> for DomainError {
    fn from(err: SourceError) -> Self {
        DomainError::SourceUnavailable(err.to_string())
    }
}

/// Element-level failures. These drop a single record and never abort a run.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementError {
    /// A mandatory field is missing or empty
    MandatoryFieldAbsent { field: &'static str },
    /// A mandatory date field is missing
    DateFieldAbsent { field: &'static str },
    /// A date field does not follow `YYYY-MM-DD HH:MM:SS.mmm`
    DateFormatMismatch { field: &'static str, value: String },
}

impl ElementError {
    /// Name of the field that caused the element to be dropped
    pub fn field(&self) -> &'static str {
        match self {
            ElementError::MandatoryFieldAbsent { field }
            | ElementError::DateFieldAbsent { field }
            | ElementError::DateFormatMismatch { field, .. } => *field,
        }
    }
}

impl fmt::Display for ElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementError::MandatoryFieldAbsent { field } => {
                write!(f, "mandatory field {} is missing", field)
            }
            ElementError::DateFieldAbsent { field } => write!(f, "date field {} is missing", field),
            ElementError::DateFormatMismatch { field, value } => {
                write!(f, "date field {} has unexpected format: {:?}", field, value)
            }
        }
    }
}

impl std::error::Error for ElementError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_becomes_source_unavailable() {
        let err: DomainError = SourceError::HttpStatus(404).into();
        assert_eq!(
            err,
            DomainError::SourceUnavailable("status error: 404".to_string())
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(SourceError::NetworkFailed("reset".into()).is_transient());
        assert!(SourceError::Timeout("30s".into()).is_transient());
        assert!(SourceError::HttpStatus(503).is_transient());
        assert!(!SourceError::HttpStatus(404).is_transient());
        assert!(!SourceError::AuthenticationFailed(401).is_transient());
        assert!(!SourceError::InvalidJson("eof".into()).is_transient());
    }

    #[test]
    fn test_element_error_field() {
        let err = ElementError::DateFormatMismatch {
            field: "EndDate",
            value: "yesterday".to_string(),
        };
        assert_eq!(err.field(), "EndDate");
        assert!(err.to_string().contains("yesterday"));
    }
}
