use input::{InputConfig, InputKind};
use normalize::NormalizeConfig;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Where and how to reach the analysis service.
///
/// Every field has a default, so a partial file or environment override is
/// enough to build one.
///
/// ```rust
/// use client::ClientConfig;
///
/// let cfg = ClientConfig {
///     base_url: "http://analysis.internal:8000".into(),
///     ..Default::default()
/// };
/// cfg.validate().unwrap();
/// assert_eq!(
///     cfg.endpoint_url(input::InputKind::Text),
///     "http://analysis.internal:8000/analyze_text"
/// );
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Service root, `http` or `https`.
    pub base_url: String,

    /// Path of the text-analysis endpoint.
    pub text_endpoint: String,

    /// Path of the file-analysis endpoint.
    pub file_endpoint: String,

    /// Overall request timeout. Unset means requests run until the service answers.
    pub timeout_secs: Option<u64>,

    /// Connection timeout. Unset leaves it to the OS.
    pub connect_timeout_secs: Option<u64>,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Checks applied before anything is sent.
    pub input: InputConfig,

    /// Result decoding options.
    pub normalize: NormalizeConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            text_endpoint: "/analyze_text".to_string(),
            file_endpoint: "/analyze_file".to_string(),
            timeout_secs: None,
            connect_timeout_secs: None,
            user_agent: default_user_agent(),
            input: InputConfig::default(),
            normalize: NormalizeConfig::default(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_user_agent() -> String {
    format!("langscope/{}", env!("CARGO_PKG_VERSION"))
}

/// Problems found while checking a [`ClientConfig`] or building its HTTP client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid base_url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("input config: {0}")]
    Input(#[from] input::ConfigError),

    #[error("cannot build HTTP client: {0}")]
    HttpClient(String),
}

impl ClientConfig {
    /// Checks the configuration without doing any I/O.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|err| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout {
                field: "timeout_secs",
            });
        }
        if self.connect_timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout {
                field: "connect_timeout_secs",
            });
        }
        self.input.validate()?;
        Ok(())
    }

    /// Full URL of the endpoint that serves `kind`.
    pub fn endpoint_url(&self, kind: InputKind) -> String {
        let path = match kind {
            InputKind::Text => &self.text_endpoint,
            InputKind::File => &self.file_endpoint,
        };
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.base_url, "http://127.0.0.1:5000");
        assert_eq!(cfg.text_endpoint, "/analyze_text");
        assert_eq!(cfg.file_endpoint, "/analyze_file");
        assert!(cfg.timeout().is_none());
        assert!(cfg.connect_timeout().is_none());
        assert!(cfg.user_agent.starts_with("langscope/"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_endpoint_selection() {
        let cfg = ClientConfig {
            base_url: "https://svc.example.com/api/".into(),
            ..Default::default()
        };
        assert_eq!(
            cfg.endpoint_url(InputKind::Text),
            "https://svc.example.com/api/analyze_text"
        );
        assert_eq!(
            cfg.endpoint_url(InputKind::File),
            "https://svc.example.com/api/analyze_file"
        );
    }

    #[test]
    fn test_rejects_bad_urls() {
        let cfg = ClientConfig {
            base_url: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));

        let cfg = ClientConfig {
            base_url: "ftp://svc.example.com".into(),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_timeouts() {
        let cfg = ClientConfig {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroTimeout {
                field: "timeout_secs"
            })
        );
    }

    #[test]
    fn test_input_config_errors_bubble_up() {
        let cfg = ClientConfig {
            input: InputConfig {
                max_file_bytes: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Input(_))));
    }

    #[test]
    fn test_partial_json() {
        let cfg: ClientConfig =
            serde_json::from_str(r#"{"base_url": "http://x:1", "timeout_secs": 30}"#).unwrap();
        assert_eq!(cfg.base_url, "http://x:1");
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.text_endpoint, "/analyze_text");
    }
}
