//! Error types produced by the input crate.
//!
//! Every variant is a client-side validation failure: it is raised before any
//! network activity and the caller is expected to show it to the user and stop.
//!
//! | Error | Raised when |
//! |-------|-------------|
//! | [`EmptyText`](ValidationError::EmptyText) | text is empty or whitespace-only |
//! | [`TextTooLarge`](ValidationError::TextTooLarge) | text exceeds `max_text_bytes` |
//! | [`MissingFileName`](ValidationError::MissingFileName) | file name empty after sanitization |
//! | [`EmptyFile`](ValidationError::EmptyFile) | file has zero bytes |
//! | [`FileTooLarge`](ValidationError::FileTooLarge) | file exceeds `max_file_bytes` |
//! | [`Unreadable`](ValidationError::Unreadable) | file could not be read from disk |
use thiserror::Error;

/// Errors that reject an [`AnalysisInput`](crate::AnalysisInput) before submission.
///
/// ```rust
/// use input::ValidationError;
///
/// let err = ValidationError::EmptyText;
/// assert_eq!(err.to_string(), "please enter some text");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    /// Text input is empty once surrounding whitespace is trimmed.
    #[error("please enter some text")]
    EmptyText,

    /// Text input is larger than the configured limit.
    #[error("text is {actual} bytes, limit is {limit}")]
    TextTooLarge { actual: usize, limit: usize },

    /// No usable file name remains after sanitization.
    #[error("no file selected")]
    MissingFileName,

    /// The selected file has no content.
    #[error("file '{0}' is empty")]
    EmptyFile(String),

    /// The selected file is larger than the upload limit.
    #[error("file '{name}' is {actual} bytes, limit is {limit}")]
    FileTooLarge {
        name: String,
        actual: usize,
        limit: usize,
    },

    /// The file could not be read.
    #[error("cannot read '{path}': {reason}")]
    Unreadable { path: String, reason: String },
}

impl ValidationError {
    /// Size-limit violations, as opposed to missing or malformed input.
    pub fn is_size_limit(&self) -> bool {
        matches!(
            self,
            ValidationError::TextTooLarge { .. } | ValidationError::FileTooLarge { .. }
        )
    }
}
