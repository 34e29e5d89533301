//! Script definitions
//!
//! A Gradle Kotlin script is compiled as the body of a template class. The
//! template decides which names are visible without qualification: the
//! template's own members (`plugins { }`, `buildscript { }`) and those of
//! the implicit receiver (`Project` for build scripts, `Settings` for
//! settings scripts).

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GRADLE_DEFAULT_IMPORTS;
use crate::features::classpath::domain::builtins::{
    KOTLIN_BUILD_SCRIPT, KOTLIN_SETTINGS_SCRIPT, PROJECT, SETTINGS,
};
use crate::features::classpath::domain::{Resolution, TypeDescriptor};
use crate::features::classpath::ports::SymbolResolver;
use crate::shared::models::Result;

const SETTINGS_FILE_NAME: &str = "settings.gradle.kts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptKind {
    Build,
    Settings,
}

impl ScriptKind {
    /// `settings.gradle.kts` is a settings script, everything else a build script
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let is_settings = path
            .as_ref()
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name == SETTINGS_FILE_NAME)
            .unwrap_or(false);
        if is_settings {
            ScriptKind::Settings
        } else {
            ScriptKind::Build
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptKind::Build => "build",
            ScriptKind::Settings => "settings",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDefinition {
    pub kind: ScriptKind,
    /// Template class the script body is compiled into
    pub base_class: String,
    /// Receivers in lookup order
    pub implicit_receivers: Vec<String>,
    pub default_imports: Vec<String>,
}

impl ScriptDefinition {
    pub fn build_script() -> Self {
        Self {
            kind: ScriptKind::Build,
            base_class: KOTLIN_BUILD_SCRIPT.to_string(),
            implicit_receivers: vec![PROJECT.to_string()],
            default_imports: default_imports(),
        }
    }

    pub fn settings_script() -> Self {
        Self {
            kind: ScriptKind::Settings,
            base_class: KOTLIN_SETTINGS_SCRIPT.to_string(),
            implicit_receivers: vec![SETTINGS.to_string()],
            default_imports: default_imports(),
        }
    }

    pub fn for_kind(kind: ScriptKind) -> Self {
        match kind {
            ScriptKind::Build => Self::build_script(),
            ScriptKind::Settings => Self::settings_script(),
        }
    }

    pub fn with_default_imports(mut self, imports: Vec<String>) -> Self {
        self.default_imports = imports;
        self
    }

    /// Resolve the template and receivers. Names the classpath cannot
    /// provide are dropped; attribution then falls back to imports.
    pub fn bind(&self, resolver: &dyn SymbolResolver) -> Result<BoundScript> {
        let mut implicit_receivers = Vec::with_capacity(self.implicit_receivers.len());
        for name in &self.implicit_receivers {
            match resolver.resolve(name)? {
                Resolution::Resolved(descriptor) => implicit_receivers.push(descriptor),
                Resolution::Unresolved => {
                    debug!(receiver = %name, script = self.kind.as_str(), "Implicit receiver not on classpath")
                }
            }
        }

        let base_class = match resolver.resolve(&self.base_class)? {
            Resolution::Resolved(descriptor) => Some(descriptor),
            Resolution::Unresolved => {
                debug!(template = %self.base_class, "Script template not on classpath");
                None
            }
        };

        Ok(BoundScript {
            kind: self.kind,
            implicit_receivers,
            base_class,
            default_imports: self.default_imports.clone(),
        })
    }
}

impl Default for ScriptDefinition {
    fn default() -> Self {
        Self::build_script()
    }
}

fn default_imports() -> Vec<String> {
    GRADLE_DEFAULT_IMPORTS.iter().map(|s| s.to_string()).collect()
}

/// A script definition after resolution against one classpath
#[derive(Debug, Clone)]
pub struct BoundScript {
    pub kind: ScriptKind,
    pub implicit_receivers: Vec<Arc<TypeDescriptor>>,
    pub base_class: Option<Arc<TypeDescriptor>>,
    pub default_imports: Vec<String>,
}

impl BoundScript {
    /// Receivers searched for unqualified names, innermost first
    pub fn receivers(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.implicit_receivers.iter().chain(self.base_class.iter())
    }
}
