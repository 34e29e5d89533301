//! Preset configurations
//!
//! Presets provide complete default configurations for common use cases.

use serde::{Deserialize, Serialize};

use crate::shared::models::Severity;

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Recipes and batch runs: unresolved symbols are advisory warnings,
    /// only files that are entirely unparsable collapse into one opaque node.
    Lenient,

    /// Validation runs: unresolved symbols are reported as errors.
    Strict,
}

impl Preset {
    /// Severity used for `SymbolUnresolved` diagnostics
    pub fn unresolved_severity(&self) -> Severity {
        match self {
            Self::Lenient => Severity::Warning,
            Self::Strict => Severity::Error,
        }
    }

    /// Parse preset from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(format!(
                "Unknown preset '{}'. Valid presets: lenient, strict",
                s
            )),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::Strict => "strict",
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::Lenient
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
