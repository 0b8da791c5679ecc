use serde::{Deserialize, Serialize};

/// Prefix of the diagnostic text placed in `translation` on a degraded result.
pub const DEGRADED_PREFIX: &str = "Error parsing result. Raw: ";

/// Knobs for [`normalize_with_config`](crate::normalize_with_config).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Try once more after removing a Markdown code fence around the payload.
    pub strip_code_fences: bool,
    /// Text prepended to the raw payload on a degraded result.
    pub degraded_prefix: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            strip_code_fences: true,
            degraded_prefix: DEGRADED_PREFIX.to_string(),
        }
    }
}
