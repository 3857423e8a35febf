//! Error types for the vertical-engines crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. Queries never appear in error messages.

/// Errors that can occur while building a provider request or parsing
/// a provider response.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The provider redirected us to an anti-automation page. Terminal for
    /// this request; the host should back off from the engine for a while.
    #[error("captcha detected: {0}")]
    CaptchaDetected(String),

    /// The provider response did not have the expected shape, or served a
    /// different page than the one requested. Usually transient.
    #[error("provider protocol error: {0}")]
    Protocol(String),

    /// A `time_range` value the engine has no bucket for.
    #[error("unknown time range: {0}")]
    UnknownTimeRange(String),

    /// Failed to build an internal parser (CSS selector, pattern).
    #[error("parse error: {0}")]
    Parse(String),

    /// An HTTP request on the fetch path failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Invalid fetch configuration.
    #[error("config error: {0}")]
    Config(String),

    /// No engine is registered under the given name.
    #[error("unknown engine: {0}")]
    UnknownEngine(String),
}

/// Convenience type alias for vertical-engines results.
pub type Result<T> = std::result::Result<T, EngineError>;
