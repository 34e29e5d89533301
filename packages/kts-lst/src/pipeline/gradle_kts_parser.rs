//! Gradle Kotlin DSL parser facade
//!
//! Routes `settings.gradle.kts` to the settings classpath and script
//! definition and every other `*.gradle.kts` to the buildscript ones. Each
//! classpath gets one resolver, built on first use and shared by all files
//! parsed afterwards.
//!
//! ```rust,ignore
//! let parser = GradleKtsParser::builder()
//!     .buildscript_classpath(["gradle-api.jar"])
//!     .build()?;
//! let result = parser.parse(&SourceInput::new("build.gradle.kts", source))?;
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::ParserConfig;
use crate::features::classpath::{find_artifacts, ClasspathEntry, ClasspathResolver};
use crate::features::parsing::{KotlinScriptFrontEnd, ScriptDefinition, ScriptKind};
use crate::shared::models::{LstError, Result};

use super::parse_file::parse_with;
use super::parse_result::ParseResult;

const SCRIPT_SUFFIX: &str = ".gradle.kts";
const DSL_NAME: &str = "gradle kts";

/// One script to parse: a path label and its text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInput {
    pub path: PathBuf,
    pub source: String,
}

impl SourceInput {
    pub fn new(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Read a script from disk
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let source = std::fs::read_to_string(&path)
            .map_err(|e| LstError::from(e).with_file(path.display().to_string()))?;
        Ok(Self { path, source })
    }
}

#[derive(Debug, Default)]
pub struct GradleKtsParserBuilder {
    buildscript: Vec<ClasspathEntry>,
    settings: Vec<ClasspathEntry>,
    config: ParserConfig,
}

impl GradleKtsParserBuilder {
    pub fn buildscript_classpath<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.buildscript = paths.into_iter().map(ClasspathEntry::from_path).collect();
        self
    }

    pub fn settings_classpath<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.settings = paths.into_iter().map(ClasspathEntry::from_path).collect();
        self
    }

    /// Buildscript classpath from jars named after `artifact_names` below
    /// `search_roots`
    pub fn buildscript_classpath_from_artifacts<P, S>(mut self, search_roots: &[P], artifact_names: &[S]) -> Self
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        self.buildscript = find_artifacts(search_roots, artifact_names);
        self
    }

    pub fn settings_classpath_from_artifacts<P, S>(mut self, search_roots: &[P], artifact_names: &[S]) -> Self
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        self.settings = find_artifacts(search_roots, artifact_names);
        self
    }

    pub fn config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the configuration and build the parser. No classpath entry
    /// is touched until the first parse.
    pub fn build(self) -> Result<GradleKtsParser> {
        let config = self.config.build()?;
        Ok(GradleKtsParser {
            front_end: KotlinScriptFrontEnd::new(&config),
            buildscript: self.buildscript,
            settings: self.settings,
            config,
            buildscript_resolver: OnceCell::new(),
            settings_resolver: OnceCell::new(),
            #[cfg(feature = "parallel")]
            pool: OnceCell::new(),
        })
    }
}

pub struct GradleKtsParser {
    front_end: KotlinScriptFrontEnd,
    buildscript: Vec<ClasspathEntry>,
    settings: Vec<ClasspathEntry>,
    config: ParserConfig,
    buildscript_resolver: OnceCell<Arc<ClasspathResolver>>,
    settings_resolver: OnceCell<Arc<ClasspathResolver>>,
    /// Worker pool for `parse_inputs`; `None` if it could not be started
    #[cfg(feature = "parallel")]
    pool: OnceCell<Option<rayon::ThreadPool>>,
}

impl GradleKtsParser {
    pub fn builder() -> GradleKtsParserBuilder {
        GradleKtsParserBuilder::default()
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn dsl_name(&self) -> &'static str {
        DSL_NAME
    }

    /// Whether `path` names a Gradle Kotlin script
    pub fn accept(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().to_string_lossy().ends_with(SCRIPT_SUFFIX)
    }

    /// Path label for a script given only as text
    pub fn source_path_from_source_text(&self, prefix: impl AsRef<Path>, _source: &str) -> PathBuf {
        prefix.as_ref().join("build.gradle.kts")
    }

    /// Resolver for scripts of `kind`, created on first use
    pub fn resolver(&self, kind: ScriptKind) -> Arc<ClasspathResolver> {
        let (cell, entries) = match kind {
            ScriptKind::Build => (&self.buildscript_resolver, &self.buildscript),
            ScriptKind::Settings => (&self.settings_resolver, &self.settings),
        };
        Arc::clone(cell.get_or_init(|| {
            debug!(kind = kind.as_str(), entries = entries.len(), "Creating classpath resolver");
            Arc::new(ClasspathResolver::new(entries.iter().cloned()))
        }))
    }

    pub fn parse(&self, input: &SourceInput) -> Result<ParseResult> {
        let kind = ScriptKind::from_path(&input.path);
        let resolver = self.resolver(kind);
        parse_with(
            &self.front_end,
            &input.source,
            &input.path,
            resolver.as_ref(),
            &ScriptDefinition::for_kind(kind),
            &self.config,
        )
    }

    /// Parse many scripts. Results follow input order; one file's failure
    /// leaves the others untouched.
    pub fn parse_inputs(&self, inputs: &[SourceInput]) -> Vec<Result<ParseResult>> {
        info!(
            files = inputs.len(),
            workers = self.config.effective_parallelism(),
            "Parsing scripts"
        );
        self.parse_all(inputs)
    }

    /// Built on the first batch and reused by later ones
    #[cfg(feature = "parallel")]
    fn pool(&self) -> Option<&rayon::ThreadPool> {
        self.pool
            .get_or_init(|| {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(self.config.effective_parallelism())
                    .thread_name(|i| format!("kts-lst-worker-{}", i))
                    .build();
                match pool {
                    Ok(pool) => Some(pool),
                    Err(e) => {
                        debug!(error = %e, "Thread pool unavailable, parsing sequentially");
                        None
                    }
                }
            })
            .as_ref()
    }

    #[cfg(feature = "parallel")]
    fn parse_all(&self, inputs: &[SourceInput]) -> Vec<Result<ParseResult>> {
        match self.pool() {
            Some(pool) => pool.install(|| inputs.par_iter().map(|input| self.parse(input)).collect()),
            None => inputs.iter().map(|input| self.parse(input)).collect(),
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn parse_all(&self, inputs: &[SourceInput]) -> Vec<Result<ParseResult>> {
        inputs.iter().map(|input| self.parse(input)).collect()
    }
}

impl std::fmt::Debug for GradleKtsParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradleKtsParser")
            .field("buildscript_entries", &self.buildscript.len())
            .field("settings_entries", &self.settings.len())
            .field("config", &self.config)
            .finish()
    }
}
