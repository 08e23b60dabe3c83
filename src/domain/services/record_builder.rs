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

//! Per-element record construction
//!
//! Each element of a response's `value` array either becomes exactly one
//! record or is dropped with exactly one [`DroppedElement`]. Mandatory fields
//! are checked first; optional fields fall back to empty strings, zero, or the
//! unknown CPU pair.

use crate::domain::parsers::{
    classify_cpu, get_int, get_str, normalize_hostname, parse_date_field, Lookup,
};
use crate::domain::{
    BuildOutcome, DroppedElement, ElementError, ReportConfig, SystemRecord, WarrantyRecord,
};
use log::{debug, warn};
use serde_json::Value;

/// Name of the array that carries the elements of every response
pub const ELEMENTS_FIELD: &str = "value";

/// The elements of a response, or nothing when the `value` array is missing
pub fn response_elements(root: &Value) -> &[Value] {
    match root.get(ELEMENTS_FIELD) {
        Some(Value::Array(items)) => items.as_slice(),
        Some(_) => {
            warn!("Response field '{ELEMENTS_FIELD}' is not an array");
            &[]
        }
        None => {
            warn!("Response has no '{ELEMENTS_FIELD}' array");
            &[]
        }
    }
}

/// Build inventory records from a systems response
pub fn build_system_records(root: &Value, config: &ReportConfig) -> BuildOutcome<SystemRecord> {
    collect_records(root, "system", |element| {
        build_system_record(element, config)
    })
}

/// Build warranty records from a warranty response
pub fn build_warranty_records(root: &Value) -> BuildOutcome<WarrantyRecord> {
    collect_records(root, "warranty", build_warranty_record)
}

fn collect_records<T, F>(root: &Value, kind: &str, build: F) -> BuildOutcome<T>
where
    F: Fn(&Value) -> Result<T, ElementError>,
{
    let mut outcome = BuildOutcome::new();
    for (index, element) in response_elements(root).iter().enumerate() {
        match build(element) {
            Ok(record) => outcome.records.push(record),
            Err(error) => {
                warn!("Skipping {kind} item {index}: {error}");
                outcome.dropped.push(DroppedElement { index, error });
            }
        }
    }
    outcome
}

fn mandatory_str(element: &Value, field: &'static str) -> Result<String, ElementError> {
    match get_str(element, field).value() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ElementError::MandatoryFieldAbsent { field }),
    }
}

/// Build one inventory record
pub fn build_system_record(
    element: &Value,
    config: &ReportConfig,
) -> Result<SystemRecord, ElementError> {
    let sku = mandatory_str(element, "SKU")?;

    let hostname = match get_str(element, "Name") {
        Lookup::Absent => {
            warn!("No hostname defined for SKU: {sku}");
            String::new()
        }
        name => normalize_hostname(&name.or_default(), config.fqdn),
    };

    let summary = get_str(element, "ProcessorSummary.Model").or_default();
    let cpu = classify_cpu(&summary);
    if cpu.is_unknown() {
        debug!("No CPU pattern matched {summary:?} for SKU: {sku}");
    }

    Ok(SystemRecord {
        sku,
        hostname,
        model: get_str(element, "Model").or_default(),
        cpu_count: get_int(element, "ProcessorSummary.Count").or_default(),
        cpu_family: cpu.family,
        cpu_model: cpu.model,
        memory_gib: get_int(element, "MemorySummary.TotalSystemMemoryGiB").or_default(),
    })
}

/// Build one warranty record
pub fn build_warranty_record(element: &Value) -> Result<WarrantyRecord, ElementError> {
    let device_identifier = mandatory_str(element, "DeviceIdentifier")?;
    let start_date = parse_date_field(element, "StartDate")?;
    let end_date = parse_date_field(element, "EndDate")?;

    Ok(WarrantyRecord {
        device_identifier,
        device_name: get_str(element, "DeviceName").or_default().to_lowercase(),
        device_model: get_str(element, "DeviceModel").or_default(),
        start_date,
        end_date,
        description: get_str(element, "ServiceLevelDescription").or_default(),
    })
}
