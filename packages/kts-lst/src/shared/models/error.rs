//! Error types for the kts-lst crate
//!
//! Only hard failures travel as `LstError`. Everything recoverable (missing
//! classpath entries, syntax errors, unresolved symbols) becomes a
//! [`Diagnostic`](super::Diagnostic) instead.

use std::fmt;

/// Error kind categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Classpath entry became unreadable while resolving
    Classpath,
    /// Parser could not be set up
    Parse,
    /// Configuration errors
    Config,
    /// IO errors
    IO,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Classpath => "classpath",
            ErrorKind::Parse => "parse",
            ErrorKind::Config => "config",
            ErrorKind::IO => "io",
        }
    }
}

/// Unified error type
#[derive(Debug)]
pub struct LstError {
    pub kind: ErrorKind,
    pub message: String,
    pub file_path: Option<String>,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl LstError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            file_path: None,
            source: None,
        }
    }

    pub fn with_file(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn classpath(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Classpath, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }
}

impl fmt::Display for LstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.as_str(), self.message)?;
        if let Some(ref file) = self.file_path {
            write!(f, " in {}", file)?;
        }
        Ok(())
    }
}

impl std::error::Error for LstError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, LstError>;

impl From<std::io::Error> for LstError {
    fn from(err: std::io::Error) -> Self {
        LstError::new(ErrorKind::IO, format!("IO error: {}", err)).with_source(err)
    }
}

impl From<zip::result::ZipError> for LstError {
    fn from(err: zip::result::ZipError) -> Self {
        LstError::classpath(format!("Archive error: {}", err)).with_source(err)
    }
}

impl From<crate::config::ConfigError> for LstError {
    fn from(err: crate::config::ConfigError) -> Self {
        LstError::config(err.to_string()).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LstError::classpath("archive vanished").with_file("libs/gradle-kotlin-dsl.jar");

        let msg = format!("{}", err);
        assert!(msg.contains("classpath"));
        assert!(msg.contains("archive vanished"));
        assert!(msg.contains("gradle-kotlin-dsl.jar"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error;
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: LstError = io.into();
        assert_eq!(err.kind, ErrorKind::IO);
        assert!(err.source().is_some());
    }
}
