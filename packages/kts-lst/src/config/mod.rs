//! Configuration
//!
//! Two levels, in the usual progression:
//! - Preset: `ParserConfig::preset(Preset::Strict)`
//! - YAML: `ParserConfig::from_yaml("kts-lst.yaml")` with a versioned schema
//!
//! ```rust,ignore
//! use kts_lst::config::{ParserConfig, Preset};
//!
//! let config = ParserConfig::preset(Preset::Lenient)
//!     .with_timeout_micros(2_000_000)
//!     .build()?;
//! ```

pub mod error;
pub mod io;
pub mod parser_config;
pub mod preset;
pub mod validation;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use io::ConfigFileV1;
pub use parser_config::{ParserConfig, GRADLE_DEFAULT_IMPORTS};
pub use preset::Preset;
pub use validation::Validatable;
