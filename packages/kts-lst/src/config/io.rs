//! Configuration I/O (YAML schema)
//!
//! Defines the on-disk schema. Loading and merging live in
//! `parser_config.rs`, next to the fields they fill in.

use serde::{Deserialize, Serialize};

use crate::shared::models::Severity;

/// YAML Schema v1. Every field except `version` is optional and falls back
/// to the preset's value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: u32,

    /// Base preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unresolved_severity: Option<Severity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_timeout_micros: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_error_ratio: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_imports: Option<Vec<String>>,
}
