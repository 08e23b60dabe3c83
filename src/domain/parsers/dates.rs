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

//! Vendor timestamp parsing

use super::fields::{get_str, Lookup};
use crate::domain::ElementError;
use chrono::{DateTime, NaiveDateTime, Timelike};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

/// Timestamp layout used by the warranty service, always UTC
pub const VENDOR_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

lazy_static! {
    static ref VENDOR_DATE_RE: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3}$").unwrap();
}

/// Parse `YYYY-MM-DD HH:MM:SS.mmm` into epoch seconds, dropping the milliseconds
pub fn parse_vendor_date(value: &str) -> Result<i64, String> {
    if !VENDOR_DATE_RE.is_match(value) {
        return Err(format!("{value:?} is not in YYYY-MM-DD HH:MM:SS.mmm layout"));
    }
    let dt = NaiveDateTime::parse_from_str(value, VENDOR_DATE_FORMAT)
        .map_err(|e| format!("{value:?} does not match {VENDOR_DATE_FORMAT}: {e}"))?;
    // chrono folds second 60 into the previous second
    if dt.nanosecond() >= 1_000_000_000 {
        return Err(format!("{value:?} has a seconds field out of range"));
    }
    Ok(dt.and_utc().timestamp())
}

/// Render epoch seconds in the vendor layout
pub fn format_vendor_date(epoch_seconds: i64) -> Option<String> {
    DateTime::from_timestamp(epoch_seconds, 0)
        .map(|dt| dt.naive_utc().format(VENDOR_DATE_FORMAT).to_string())
}

/// Read and parse the date stored at `path`
///
/// A missing value is [`ElementError::DateFieldAbsent`]; a value that is not a
/// string in the vendor layout is [`ElementError::DateFormatMismatch`].
pub fn parse_date_field(node: &Value, path: &'static str) -> Result<i64, ElementError> {
    let raw = match get_str(node, path) {
        Lookup::Absent => return Err(ElementError::DateFieldAbsent { field: path }),
        Lookup::Mistyped(raw) => {
            return Err(ElementError::DateFormatMismatch {
                field: path,
                value: raw,
            })
        }
        Lookup::Valid(raw) => raw,
    };
    parse_vendor_date(&raw).map_err(|_| ElementError::DateFormatMismatch {
        field: path,
        value: raw,
    })
}
