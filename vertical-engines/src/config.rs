//! Fetch configuration with sensible defaults.
//!
//! [`FetchConfig`] controls how the optional fetch path executes a
//! [`crate::RequestSpec`]. Adapters themselves take no configuration; their
//! provider tables are compiled in.

use crate::error::EngineError;

/// Configuration for executing a single provider request.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// HTTP request timeout in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents. A `User-Agent` header set by an
    /// adapter always wins.
    pub user_agent: Option<String>,
    /// Redirect hops to follow when the adapter allows redirects.
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 8,
            user_agent: None,
            max_redirects: 10,
        }
    }
}

impl FetchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds` must be greater than 0
    /// - `max_redirects` must be greater than 0
    /// - `user_agent`, when set, must not be blank
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.timeout_seconds == 0 {
            return Err(EngineError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.max_redirects == 0 {
            return Err(EngineError::Config(
                "max_redirects must be greater than 0".into(),
            ));
        }
        if self
            .user_agent
            .as_deref()
            .is_some_and(|ua| ua.trim().is_empty())
        {
            return Err(EngineError::Config("user_agent must not be blank".into()));
        }
        Ok(())
    }
}
