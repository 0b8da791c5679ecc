//! Data model for analysis inputs.
//!
//! ```text
//! AnalysisInput
//! ├── Text { content: String }
//! └── File(FileInput)
//!     ├── name: String
//!     ├── bytes: Bytes
//!     └── content_type: Option<String>
//! ```
//!
//! Exactly one variant exists per input, so "text and file at once" cannot be
//! expressed. Whether a text input is *eligible* for submission is decided by
//! [`validate_input`](crate::validate_input).
use std::fmt;
use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Which analysis endpoint an input is routed to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    File,
}

impl InputKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::File => "file",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A media or document file selected for analysis.
#[derive(Clone, PartialEq, Eq)]
pub struct FileInput {
    /// File name as it will appear in the multipart part.
    pub name: String,
    /// Raw file content.
    pub bytes: Bytes,
    /// MIME type. Guessed from `name` during validation when absent.
    pub content_type: Option<String>,
}

impl FileInput {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// File content can be megabytes; keep it out of logs and panic messages.
impl fmt::Debug for FileInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileInput")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Something to analyze: free text or a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisInput {
    Text { content: String },
    File(FileInput),
}

impl AnalysisInput {
    pub fn text(content: impl Into<String>) -> Self {
        AnalysisInput::Text {
            content: content.into(),
        }
    }

    pub fn file(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        AnalysisInput::File(FileInput::new(name, bytes))
    }

    /// Reads a file from disk. The file name is taken from the last path component.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| ValidationError::Unreadable {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(AnalysisInput::file(name, bytes))
    }

    pub fn kind(&self) -> InputKind {
        match self {
            AnalysisInput::Text { .. } => InputKind::Text,
            AnalysisInput::File(_) => InputKind::File,
        }
    }

    /// Payload size in bytes (UTF-8 length for text).
    pub fn len(&self) -> usize {
        match self {
            AnalysisInput::Text { content } => content.len(),
            AnalysisInput::File(file) => file.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
