//! Error types for the Zero valuation tools.

use thiserror::Error;

/// Result type alias using the Zero error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Zero tools.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an error with additional context.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Process exit code suitable for command-line runners.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 78,
            Self::NotFound(_) | Self::Json(_) => 65,
            Self::Io(_) => 74,
            Self::WithContext { source, .. } => source.exit_code(),
        }
    }
}

/// Extension trait for adding context to any error type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::Config("test".into()).exit_code(), 78);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 65);
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(Error::from(io).exit_code(), 74);
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::NotFound("quote for 005930".into());
        let with_ctx = err.with_context("valuing 005930");
        assert!(matches!(with_ctx, Error::WithContext { .. }));
        assert_eq!(with_ctx.exit_code(), 65);
        assert_eq!(with_ctx.to_string(), "valuing 005930: Not found: quote for 005930");
    }

    #[test]
    fn test_result_ext_context() {
        let parsed: std::result::Result<f64, serde_json::Error> = serde_json::from_str("nope");
        let err = parsed.context("parsing request").unwrap_err();
        assert!(err.to_string().starts_with("parsing request: JSON error"));
    }
}
