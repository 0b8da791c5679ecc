//! langscope input layer
//!
//! Everything that gets analyzed enters here first. An [`AnalysisInput`] is
//! either a piece of text or a file; [`validate_input`] checks it against an
//! [`InputConfig`] and returns the input ready for dispatch.
//!
//! ## What we check
//!
//! - **Text** must contain something other than whitespace, and stay under
//!   `max_text_bytes` when that limit is set. The text itself is sent as typed;
//!   trimming is only used for the emptiness check.
//! - **Files** need a usable name (control characters and directories are
//!   stripped), at least one byte, and must fit under `max_file_bytes`.
//!   A content type is guessed from the extension when none was given.
//!
//! Nothing here touches the network. A failed check is always a
//! [`ValidationError`] the caller can show as-is.
//!
//! ## Example
//!
//! ```
//! use input::{validate_input, AnalysisInput, InputConfig, ValidationError};
//!
//! let cfg = InputConfig::default();
//!
//! let ok = validate_input(AnalysisInput::text("Bonjour"), &cfg).unwrap();
//! assert_eq!(ok, AnalysisInput::text("Bonjour"));
//!
//! let err = validate_input(AnalysisInput::text("  \n\t"), &cfg).unwrap_err();
//! assert_eq!(err, ValidationError::EmptyText);
//! ```
use tracing::{debug, warn};

mod config;
mod error;
mod file;
mod types;

pub use crate::config::{ConfigError, InputConfig, DEFAULT_MAX_FILE_BYTES};
pub use crate::error::ValidationError;
pub use crate::file::{guess_content_type, sanitize_file_name};
pub use crate::types::{AnalysisInput, FileInput, InputKind};

/// Validates an input and returns it in the shape that will be sent.
pub fn validate_input(
    input: AnalysisInput,
    cfg: &InputConfig,
) -> Result<AnalysisInput, ValidationError> {
    let kind = input.kind();
    let len = input.len();
    match validate_inner(input, cfg) {
        Ok(input) => {
            debug!(kind = %kind, len, "input_accepted");
            Ok(input)
        }
        Err(err) => {
            warn!(kind = %kind, len, error = %err, "input_rejected");
            Err(err)
        }
    }
}

fn validate_inner(
    input: AnalysisInput,
    cfg: &InputConfig,
) -> Result<AnalysisInput, ValidationError> {
    match input {
        AnalysisInput::Text { content } => {
            if content.trim().is_empty() {
                return Err(ValidationError::EmptyText);
            }
            if let Some(limit) = cfg.max_text_bytes {
                if content.len() > limit {
                    return Err(ValidationError::TextTooLarge {
                        actual: content.len(),
                        limit,
                    });
                }
            }
            Ok(AnalysisInput::Text { content })
        }
        AnalysisInput::File(mut file) => {
            let name = if cfg.sanitize_file_names {
                sanitize_file_name(&file.name)
            } else {
                Some(file.name.trim().to_string()).filter(|n| !n.is_empty())
            };
            file.name = name.ok_or(ValidationError::MissingFileName)?;

            if file.is_empty() {
                return Err(ValidationError::EmptyFile(file.name));
            }
            if let Some(limit) = cfg.max_file_bytes {
                if file.len() > limit {
                    return Err(ValidationError::FileTooLarge {
                        actual: file.len(),
                        name: file.name,
                        limit,
                    });
                }
            }
            if file.content_type.is_none() {
                file.content_type = guess_content_type(&file.name);
            }
            Ok(AnalysisInput::File(file))
        }
    }
}
