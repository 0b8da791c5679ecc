use input::{InputKind, ValidationError};
use thiserror::Error;

/// Failure talking to the analysis service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportError {
    /// The request never produced a response: connect, timeout, body build.
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered outside the 2xx range.
    #[error("HTTP error {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The 2xx body was not the JSON object the endpoint promises.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl TransportError {
    /// Short description suitable for a user-facing notice.
    pub fn detail(&self) -> String {
        match self {
            TransportError::Request(reason) => reason.clone(),
            TransportError::Status { status, detail } if detail.is_empty() => {
                format!("HTTP {status}")
            }
            TransportError::Status { detail, .. } => detail.clone(),
            TransportError::Decode(reason) => format!("invalid response: {reason}"),
        }
    }
}

/// Everything that can end a submission without a display model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubmitError {
    /// Rejected locally. No request was sent and no state changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Another submission is still in flight.
    #[error("an analysis request is already in flight")]
    Busy,

    #[error("{kind} analysis request failed: {source}")]
    Transport {
        kind: InputKind,
        #[source]
        source: TransportError,
    },

    /// The service answered but reported an error of its own.
    #[error("{kind} analysis rejected by service: {detail}")]
    Service { kind: InputKind, detail: String },
}

impl SubmitError {
    /// Text for the blocking failure notice shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Validation(ValidationError::EmptyText) => {
                "Please enter some text".to_string()
            }
            SubmitError::Validation(ValidationError::MissingFileName) => {
                "Please select a file".to_string()
            }
            SubmitError::Validation(err) => format!("Invalid input: {err}"),
            SubmitError::Busy => "An analysis is already running".to_string(),
            SubmitError::Transport { kind, source } => {
                format!("{}{}", failure_prefix(*kind), source.detail())
            }
            SubmitError::Service { kind, detail } => {
                format!("{}{}", failure_prefix(*kind), detail)
            }
        }
    }

    /// True when the request reached the service (or tried to).
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            SubmitError::Transport { .. } | SubmitError::Service { .. }
        )
    }
}

fn failure_prefix(kind: InputKind) -> &'static str {
    match kind {
        InputKind::Text => "Error analyzing text: ",
        InputKind::File => "Error analyzing file: ",
    }
}
