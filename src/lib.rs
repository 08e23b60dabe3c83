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

//! OpenManage Enterprise report library
//!
//! Turns loosely-shaped JSON from a hardware-management REST API (or a saved
//! snapshot of it) into an inventory table or a warranty export, using a
//! Ports and Adapters (Hexagonal) architecture.
//!
//! # Architecture
//!
//! - **Domain**: records, tolerant field access, parsers, renderers
//! - **Ports**: Interfaces for sources, repositories and configuration
//! - **Adapters**: File, HTTP and TOML implementations
//!
//! # Usage
//!
//! ```rust,no_run
//! use ome_report::{AppConfig, ContainerConfig, OmeReportingService, ServiceContainer};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let container = ServiceContainer::new(AppConfig::default(), ContainerConfig::default());
//!     let service = container.create_inventory_service()?;
//!
//!     let outcome = service.collect_inventory().await?;
//!     ome_report::render_system_table(&outcome.records, &mut std::io::stdout().lock())?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod container;
pub mod domain;
pub mod ports;

pub use adapters::{
    ConfigError, FileJsonSource, FileSystemRepository, HttpJsonSource, TomlConfigurationProvider,
    DEFAULT_CONFIG_FILE,
};
pub use container::{
    ContainerConfig, ContainerConfigBuilder, ServiceContainer, SimpleConfigurationProvider,
};
pub use domain::{
    render_system_table, render_warranty_json, AppConfig, BuildOutcome, DomainError,
    DroppedElement, ElementError, ReportConfig, SourceError, SystemRecord, WarrantyRecord,
};
pub use ports::{ConfigurationProvider, FileRepository, JsonSource, OmeReportingService};
