//! Error types for Audimeter Core

use thiserror::Error;

/// Result type alias for measurement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Measurement error types
#[derive(Error, Debug)]
pub enum Error {
    // SDK bootstrap errors
    #[error("SDK script did not load within {timeout_ms}ms")]
    SdkLoadTimeout { timeout_ms: u64 },

    #[error("SDK script failed to load: {0}")]
    SdkLoad(String),

    #[error("SDK instance unavailable")]
    SdkUnavailable,

    // Configuration errors
    #[error("Missing measurement credentials")]
    MissingCredentials,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Returns true if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        // A load timeout is terminal for the session; bad config can be
        // corrected by a later set_metadata.
        matches!(self, Error::MissingCredentials | Error::InvalidConfig(_))
    }

    /// Returns the error code for diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::SdkLoadTimeout { .. } => "SDK_LOAD_TIMEOUT",
            Error::SdkLoad(_) => "SDK_LOAD",
            Error::SdkUnavailable => "SDK_UNAVAILABLE",
            Error::MissingCredentials => "MISSING_CREDENTIALS",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}
