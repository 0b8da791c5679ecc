//! Configuration for input validation.
//!
//! [`InputConfig`] controls the client-side checks applied to an
//! [`AnalysisInput`](crate::AnalysisInput) before it is handed to the request
//! orchestrator. It is cheap to clone and deserializes from any format the
//! `config` crate understands.
//!
//! ```rust
//! use input::InputConfig;
//!
//! let config = InputConfig::default();
//! config.validate().expect("default config is valid");
//! assert_eq!(config.max_file_bytes, Some(50 * 1024 * 1024));
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upload limit enforced by the analysis service.
pub const DEFAULT_MAX_FILE_BYTES: usize = 50 * 1024 * 1024;

/// Runtime configuration for input validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InputConfig {
    /// Maximum size of an uploaded file. `None` disables the check.
    pub max_file_bytes: Option<usize>,

    /// Maximum size of a text submission. `None` disables the check.
    pub max_text_bytes: Option<usize>,

    /// Remove control characters and directory components from file names.
    pub sanitize_file_names: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: Some(DEFAULT_MAX_FILE_BYTES),
            max_text_bytes: None,
            sanitize_file_names: true,
        }
    }
}

/// Errors raised by [`InputConfig::validate`]. Meant for start-up, not request time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A size limit of zero would reject every input.
    #[error("{field} must be greater than zero")]
    ZeroLimit { field: &'static str },
}

impl InputConfig {
    /// Checks internal consistency. In-memory only.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_file_bytes == Some(0) {
            return Err(ConfigError::ZeroLimit {
                field: "max_file_bytes",
            });
        }
        if self.max_text_bytes == Some(0) {
            return Err(ConfigError::ZeroLimit {
                field: "max_text_bytes",
            });
        }
        Ok(())
    }
}
