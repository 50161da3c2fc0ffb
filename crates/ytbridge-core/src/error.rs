//! Error types for ytbridge Core

use thiserror::Error;

/// Result type alias for tech operations
pub type Result<T> = std::result::Result<T, Error>;

/// Tech error types
///
/// Expected external conditions (a stalled bootstrap, a redundant volume set,
/// a platform that blocks programmatic play) are never errors; these variants
/// cover caller mistakes and unusable input only.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No YouTube media id found in source: {url}")]
    UnrecognizedSource { url: String },

    #[error("Unsupported source type: {0}")]
    UnsupportedSourceType(String),

    #[error("Bootstrap already signaled ready; load instead of enqueuing")]
    BootstrapAlreadyReady,

    #[error("Tech has been disposed")]
    Disposed,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for logs and host-facing reports
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::UnrecognizedSource { .. } => "UNRECOGNIZED_SOURCE",
            Error::UnsupportedSourceType(_) => "UNSUPPORTED_TYPE",
            Error::BootstrapAlreadyReady => "BOOTSTRAP_READY",
            Error::Disposed => "DISPOSED",
            Error::Serialization(_) => "SERIALIZATION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = Error::UnrecognizedSource { url: "https://example.com".into() };
        assert_eq!(err.error_code(), "UNRECOGNIZED_SOURCE");
        assert!(err.to_string().contains("https://example.com"));
        assert_eq!(Error::Disposed.error_code(), "DISPOSED");
    }
}
