//! Parsing of xCAT SMAPI reports into typed records
//!
//! xCAT answers every `smcli` query with the same envelope around a block of text, where each
//! line looks like `zhcpnode: Field name: value` or `zhcpnode: FIELD=value`. This module turns
//! that text into records the metrics builder can consume.
//!
//! ## Pipeline
//!
//! 1. [`envelope::extract`] strips the envelope and splits the payload into lines
//! 2. [`lines::parse_colon`] (page, spool) and [`lines::parse_equals`] (cpu/memory) build one
//!    [`MetricRecord`] per report
//! 3. [`disk::parse_disk`] joins the volume definition and free space reports into
//!    [`VolumeRecord`]s
//!
//! Nothing in here returns an error. Lines that do not fit a pattern are skipped and values
//! that do not coerce to a number are kept as text.

pub mod disk;
pub mod envelope;
pub mod lines;

#[cfg(test)]
pub(crate) mod fixtures;

pub use disk::{parse_disk, VolumeRecord};
pub use envelope::extract;
pub use lines::{parse_colon, parse_equals};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Turn a report label into a record key: `"Available percentage"` -> `"available_percentage"`
pub fn normalize(field: &str) -> String {
    WHITESPACE_RUN.replace_all(field, "_").to_lowercase()
}

/// A report value after coercion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Integer if `raw` parses as one, the raw text otherwise
    pub fn int_or_text(raw: &str) -> Self {
        raw.parse::<i64>()
            .map(FieldValue::Int)
            .unwrap_or_else(|_| FieldValue::Text(raw.to_string()))
    }

    /// Float if `raw` parses as one, the raw text otherwise
    pub fn float_or_text(raw: &str) -> Self {
        raw.parse::<f64>()
            .map(FieldValue::Float)
            .unwrap_or_else(|_| FieldValue::Text(raw.to_string()))
    }

    /// Numeric value for a gauge, `None` for text
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// Fields of one page, spool or cpu/memory report, keyed by normalized field name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricRecord {
    fields: HashMap<String, FieldValue>,
}

impl MetricRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any earlier value for the same key
    pub fn insert(&mut self, key: String, value: FieldValue) {
        self.fields.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Lookup of output fields by name, used by the metrics builder
///
/// Implemented by every record type a report parser produces so that a single
/// table-driven builder handles all domains.
pub trait ReportRecord {
    /// Value of the named output field, if the record has it
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// True when the record carries no data at all
    fn is_empty(&self) -> bool;
}

impl ReportRecord for MetricRecord {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.get(name).cloned()
    }

    fn is_empty(&self) -> bool {
        MetricRecord::is_empty(self)
    }
}
