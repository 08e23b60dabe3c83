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

//! Processor family classification from free-form model strings

use crate::domain::UNKNOWN_CPU;
use lazy_static::lazy_static;
use regex::Regex;

/// Ordered (family, pattern) table. The first pattern that matches wins.
///
/// Each pattern captures the family token in group 1 and the model code in
/// group 2.
pub const CPU_FAMILY_PATTERNS: &[(&str, &str)] = &[
    ("Xeon", r"(Xeon).*([0-9]{4})"),
    ("EPYC", r"(EPYC).*([0-9][A-Z][0-9]{2})"),
];

lazy_static! {
    static ref CPU_FAMILY_RES: Vec<CpuPattern> = CPU_FAMILY_PATTERNS
        .iter()
        .map(|(family, pattern)| CpuPattern::new(family, pattern).unwrap())
        .collect();
}

/// A compiled entry of the classification table
#[derive(Debug, Clone)]
pub struct CpuPattern {
    pub family: String,
    regex: Regex,
}

impl CpuPattern {
    pub fn new(family: &str, pattern: &str) -> Result<Self, String> {
        let regex =
            Regex::new(pattern).map_err(|e| format!("Invalid pattern for {family}: {e}"))?;
        if regex.captures_len() < 3 {
            return Err(format!(
                "Pattern for {family} must capture a family and a model token"
            ));
        }
        Ok(Self {
            family: family.to_string(),
            regex,
        })
    }

    fn captures(&self, summary: &str) -> Option<(String, String)> {
        let caps = self.regex.captures(summary)?;
        let family = caps.get(1)?.as_str();
        let model = caps.get(2)?.as_str();
        Some((family.to_string(), model.to_string()))
    }
}

/// Vendor family and model code extracted from a processor summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuClassification {
    pub family: String,
    pub model: String,
}

impl CpuClassification {
    /// The `("Unk", "Unk")` pair
    pub fn unknown() -> Self {
        Self {
            family: UNKNOWN_CPU.to_string(),
            model: UNKNOWN_CPU.to_string(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.family == UNKNOWN_CPU && self.model == UNKNOWN_CPU
    }
}

/// Classify a processor summary with the built-in pattern table
///
/// # Examples
/// ```
/// use ome_report::domain::parsers::classify_cpu;
///
/// let cpu = classify_cpu("Intel(R) Xeon(R) Gold 6258R CPU @ 2.70GHz");
/// assert_eq!((cpu.family.as_str(), cpu.model.as_str()), ("Xeon", "6258"));
/// ```
pub fn classify_cpu(summary: &str) -> CpuClassification {
    classify_cpu_with(&CPU_FAMILY_RES, summary)
}

/// Classify a processor summary against an explicit pattern table
pub fn classify_cpu_with(patterns: &[CpuPattern], summary: &str) -> CpuClassification {
    patterns
        .iter()
        .find_map(|pattern| pattern.captures(summary))
        .map(|(family, model)| CpuClassification { family, model })
        .unwrap_or_else(CpuClassification::unknown)
}
