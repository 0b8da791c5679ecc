//! Terminal rendering of a [`DisplayModel`].

use present::DisplayModel;

const LABEL_WIDTH: usize = 13;

/// Renders the result panel as aligned `label: value` lines.
///
/// The transcription block only appears when the model says it is visible;
/// its text is indented and otherwise printed as received.
pub fn render_text(model: &DisplayModel) -> String {
    let mut out = String::new();
    push_row(&mut out, "Language", &model.language);
    push_row(&mut out, "Confidence", &model.confidence);
    push_row(&mut out, "Translation", &model.translation);
    push_row(&mut out, "Time", &model.time);

    if let Some(text) = model.transcription.text() {
        out.push_str("Transcription:\n");
        for line in text.lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// Renders the model as pretty JSON.
pub fn render_json(model: &DisplayModel) -> serde_json::Result<String> {
    serde_json::to_string_pretty(model)
}

fn push_row(out: &mut String, label: &str, value: &str) {
    let label = format!("{label}:");
    out.push_str(&format!("{label:<LABEL_WIDTH$} {value}\n"));
}
