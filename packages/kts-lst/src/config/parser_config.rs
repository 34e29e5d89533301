//! Parser configuration
//!
//! One `ParserConfig` drives a whole `GradleKtsParser`: how hard the front end
//! tries before giving up on a file, how loudly unresolved symbols are
//! reported, and which packages are imported by default.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::{ConfigError, ConfigResult};
use super::io::ConfigFileV1;
use super::preset::Preset;
use super::validation::Validatable;
use crate::shared::models::Severity;

/// Packages every Gradle Kotlin DSL script sees without an import
pub const GRADLE_DEFAULT_IMPORTS: &[&str] = &[
    "org.gradle.kotlin.dsl",
    "org.gradle.api",
    "org.gradle.api.artifacts",
    "org.gradle.api.file",
    "org.gradle.api.plugins",
    "org.gradle.api.tasks",
    "java.io",
    "java.lang",
    "kotlin",
    "kotlin.collections",
];

const SUPPORTED_VERSIONS: &[u32] = &[1];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserConfig {
    pub preset: Preset,

    /// Severity of `SymbolUnresolved` diagnostics
    pub unresolved_severity: Severity,

    /// Abort the front end after this many microseconds (None = no limit)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_timeout_micros: Option<u64>,

    /// Fraction of source bytes covered by error nodes at which a file is
    /// treated as unparsable and wrapped whole
    pub max_error_ratio: f64,

    /// Worker threads for batch parsing (0 = number of CPUs)
    pub parallelism: usize,

    /// Packages imported implicitly into every script
    pub default_imports: Vec<String>,
}

impl ParserConfig {
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            unresolved_severity: preset.unresolved_severity(),
            parse_timeout_micros: None,
            max_error_ratio: 1.0,
            parallelism: 0,
            default_imports: GRADLE_DEFAULT_IMPORTS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_timeout_micros(mut self, micros: u64) -> Self {
        self.parse_timeout_micros = Some(micros);
        self
    }

    pub fn with_max_error_ratio(mut self, ratio: f64) -> Self {
        self.max_error_ratio = ratio;
        self
    }

    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = threads;
        self
    }

    pub fn with_unresolved_severity(mut self, severity: Severity) -> Self {
        self.unresolved_severity = severity;
        self
    }

    pub fn with_default_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_imports = imports.into_iter().map(Into::into).collect();
        self
    }

    /// Effective worker count
    pub fn effective_parallelism(&self) -> usize {
        if self.parallelism == 0 {
            num_cpus::get().max(1)
        } else {
            self.parallelism
        }
    }

    /// Validate and freeze
    pub fn build(self) -> ConfigResult<Self> {
        if let Err(e) = self.validate() {
            warn!(config = self.config_name(), error = %e, "Rejected configuration");
            return Err(e);
        }
        Ok(self)
    }

    /// Load a versioned YAML configuration file
    pub fn from_yaml(path: &str) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let raw: serde_yaml::Value = serde_yaml::from_str(content)?;
        if raw.get("version").is_none() {
            return Err(ConfigError::MissingVersion);
        }

        let file: ConfigFileV1 = serde_yaml::from_value(raw)?;
        if !SUPPORTED_VERSIONS.contains(&file.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: file.version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = match file.preset.as_deref() {
            Some(name) => {
                Preset::from_str(name).map_err(|_| ConfigError::UnknownPreset(name.to_string()))?
            }
            None => Preset::default(),
        };

        let mut config = Self::preset(preset);
        if let Some(severity) = file.unresolved_severity {
            config.unresolved_severity = severity;
        }
        if file.parse_timeout_micros.is_some() {
            config.parse_timeout_micros = file.parse_timeout_micros;
        }
        if let Some(ratio) = file.max_error_ratio {
            config.max_error_ratio = ratio;
        }
        if let Some(threads) = file.parallelism {
            config.parallelism = threads;
        }
        if let Some(imports) = file.default_imports {
            config.default_imports = imports;
        }

        config.build()
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: 1,
            preset: Some(self.preset.to_string()),
            unresolved_severity: Some(self.unresolved_severity),
            parse_timeout_micros: self.parse_timeout_micros,
            max_error_ratio: Some(self.max_error_ratio),
            parallelism: Some(self.parallelism),
            default_imports: Some(self.default_imports.clone()),
        };
        serde_yaml::to_string(&file).map_err(ConfigError::Yaml)
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

impl Validatable for ParserConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !(self.max_error_ratio > 0.0 && self.max_error_ratio <= 1.0) {
            return Err(ConfigError::range_with_hint(
                "max_error_ratio",
                self.max_error_ratio,
                "0 (exclusive)",
                1.0,
                "Use 1.0 to only give up on files that are entirely unparsable",
            ));
        }
        if let Some(0) = self.parse_timeout_micros {
            return Err(ConfigError::range_with_hint(
                "parse_timeout_micros",
                0,
                1,
                u64::MAX,
                "Omit the field to disable the timeout",
            ));
        }
        if self.parallelism > 1024 {
            return Err(ConfigError::range_with_hint(
                "parallelism",
                self.parallelism,
                0,
                1024,
                "Use 0 to match the number of CPUs",
            ));
        }
        for import in &self.default_imports {
            let valid = !import.is_empty()
                && import
                    .split('.')
                    .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_alphanumeric() || c == '_'));
            if !valid {
                return Err(ConfigError::InvalidImport(import.clone()));
            }
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "ParserConfig"
    }
}
