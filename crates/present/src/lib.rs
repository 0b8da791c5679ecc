//! langscope presentation
//!
//! Maps a [`CanonicalResult`] to a [`DisplayModel`]: plain strings with every
//! placeholder and number format already decided. The renderer on the other
//! side only copies strings into place.
//!
//! ```
//! use normalize::{normalize, RawResultPayload};
//! use present::{present, Transcription};
//! use serde_json::json;
//!
//! let result = normalize(&RawResultPayload::new(json!({"confidence": 0.873})));
//! let model = present(&result, Transcription::Hidden);
//! assert_eq!(model.confidence, "87.3%");
//! assert_eq!(model.translation, "-");
//! ```
use normalize::CanonicalResult;

mod model;

pub use crate::model::{DisplayModel, Transcription, PLACEHOLDER};

/// Formats a confidence in `[0, 1]` as a percentage with one decimal.
///
/// An exact tie (`87.25`) rounds up, not to even.
pub fn format_confidence(confidence: Option<f64>) -> String {
    match confidence {
        Some(value) => format!("{}%", one_decimal(value * 100.0)),
        None => PLACEHOLDER.to_string(),
    }
}

fn one_decimal(value: f64) -> String {
    // Halfway between two tenths means `value * 4` is an odd integer;
    // both the scaling and the check are exact in binary.
    let quarters = value * 4.0;
    let is_tie = quarters.is_finite() && quarters.fract() == 0.0 && quarters % 2.0 != 0.0;
    if is_tie {
        let tenths = (value * 10.0 + 0.5).floor();
        format!("{:.1}", tenths / 10.0)
    } else {
        format!("{value:.1}")
    }
}

/// Builds the display model. Pure; never fails.
pub fn present(result: &CanonicalResult, transcription: Transcription) -> DisplayModel {
    DisplayModel {
        language: result.language().unwrap_or(PLACEHOLDER).to_string(),
        confidence: format_confidence(result.confidence()),
        translation: result.translation().unwrap_or(PLACEHOLDER).to_string(),
        time: result
            .execution_time()
            .map(|time| format!("{time}s"))
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        transcription,
    }
}
