use serde::Serialize;

/// Shown in place of any value that is not available.
pub const PLACEHOLDER: &str = "-";

/// Transcription panel content. Only file analysis produces one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "visibility", content = "text", rename_all = "snake_case")]
pub enum Transcription {
    #[default]
    Hidden,
    Shown(String),
}

impl Transcription {
    pub fn is_shown(&self) -> bool {
        matches!(self, Transcription::Shown(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Transcription::Shown(text) => Some(text),
            Transcription::Hidden => None,
        }
    }
}

/// Fully formatted result, ready to be copied into a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayModel {
    pub language: String,
    pub confidence: String,
    pub translation: String,
    pub time: String,
    pub transcription: Transcription,
}

impl DisplayModel {
    /// Visibility flag for the transcription panel.
    pub fn show_transcription(&self) -> bool {
        self.transcription.is_shown()
    }
}
