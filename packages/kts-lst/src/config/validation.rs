//! Configuration validation

use super::error::ConfigResult;

/// Checked before a configuration is handed to the parser
pub trait Validatable {
    /// First violated constraint, if any
    fn validate(&self) -> ConfigResult<()>;

    /// Name used when logging a rejected configuration
    fn config_name(&self) -> &'static str;
}
