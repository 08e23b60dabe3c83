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

//! Tolerant field lookup on loosely-shaped JSON elements
//!
//! A lookup distinguishes three outcomes: the field is absent, the field is
//! present but holds an unexpected type (a best-effort value is still
//! produced), or the field is present and well-typed. Callers decide per
//! field whether absence drops the record or falls back to a default.

use serde_json::Value;

/// Outcome of looking up a single field
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// No value at the requested path
    Absent,
    /// A value exists but has the wrong JSON type; carries a best-effort conversion
    Mistyped(T),
    /// A value of the expected type
    Valid(T),
}

impl<T> Lookup<T> {
    /// True unless the field is syntactically absent
    pub fn found(&self) -> bool {
        !matches!(self, Lookup::Absent)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Lookup::Valid(_))
    }

    /// The carried value, if any
    pub fn value(self) -> Option<T> {
        match self {
            Lookup::Absent => None,
            Lookup::Mistyped(v) | Lookup::Valid(v) => Some(v),
        }
    }

    /// The carried value, or `default` when absent
    pub fn or(self, default: T) -> T {
        self.value().unwrap_or(default)
    }
}

impl<T: Default> Lookup<T> {
    /// The carried value, or the type's zero value when absent
    pub fn or_default(self) -> T {
        self.value().unwrap_or_default()
    }
}

/// Resolve a dot-separated path (e.g. `ProcessorSummary.Count`) inside `node`
pub fn lookup_path<'a>(node: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(node, |current, key| current.as_object()?.get(key))
}

/// Look up a string field
pub fn get_str(node: &Value, path: &str) -> Lookup<String> {
    match lookup_path(node, path) {
        None => Lookup::Absent,
        Some(Value::String(s)) => Lookup::Valid(s.clone()),
        Some(Value::Number(n)) => Lookup::Mistyped(n.to_string()),
        Some(Value::Bool(b)) => Lookup::Mistyped(b.to_string()),
        Some(_) => Lookup::Mistyped(String::new()),
    }
}

/// Look up an integer field
pub fn get_int(node: &Value, path: &str) -> Lookup<i64> {
    match lookup_path(node, path) {
        None => Lookup::Absent,
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Lookup::Valid(i),
            None => Lookup::Mistyped(n.as_f64().map(truncate_to_i64).unwrap_or(0)),
        },
        Some(Value::String(s)) => Lookup::Mistyped(parse_int_lenient(s)),
        Some(Value::Bool(b)) => Lookup::Mistyped(i64::from(*b)),
        Some(_) => Lookup::Mistyped(0),
    }
}

fn parse_int_lenient(s: &str) -> i64 {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().map(truncate_to_i64))
        .unwrap_or(0)
}

fn truncate_to_i64(f: f64) -> i64 {
    // `as` saturates at the i64 bounds and maps NaN to 0
    f.trunc() as i64
}
