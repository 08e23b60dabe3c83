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

//! Report rendering
//!
//! Both renderers are stateless: the same records always produce the same bytes.

use crate::domain::{DomainError, SystemRecord, WarrantyRecord};
use std::io::Write;

/// Minimum width of the hostname column
pub const HOSTNAME_WIDTH: usize = 20;
/// Minimum width of the model column
pub const MODEL_WIDTH: usize = 30;

/// Format one inventory line, newline included
pub fn format_system_line(record: &SystemRecord) -> String {
    format!(
        "{} {:<hw$} {:<mw$} {} {} {} {}\n",
        record.sku,
        record.hostname,
        record.model,
        record.cpu_count,
        record.cpu_family,
        record.cpu_model,
        record.memory_gib,
        hw = HOSTNAME_WIDTH,
        mw = MODEL_WIDTH,
    )
}

/// Write the inventory table, one line per record, no header or footer
///
/// Lines are written as they are formatted, so a write error leaves the
/// earlier lines in place.
pub fn render_system_table<W: Write>(
    records: &[SystemRecord],
    out: &mut W,
) -> Result<(), DomainError> {
    for record in records {
        out.write_all(format_system_line(record).as_bytes())
            .map_err(|e| DomainError::WriteFailed(format!("Failed to write table row: {e}")))?;
    }
    out.flush()
        .map_err(|e| DomainError::WriteFailed(format!("Failed to flush table: {e}")))
}

/// Serialize warranty records as a single compact JSON array
pub fn render_warranty_json(records: &[WarrantyRecord]) -> Result<Vec<u8>, DomainError> {
    serde_json::to_vec(records)
        .map_err(|e| DomainError::SerializationFailed(format!("JSON serialization failed: {e}")))
}
