//! Application settings for the `langscope` front end.
//!
//! Settings are layered, later sources winning:
//!
//! 1. built-in defaults,
//! 2. a `langscope.{toml,yaml,json}` file in the working directory, or the
//!    file passed with `--config`,
//! 3. `LANGSCOPE__*` environment variables, `__` separating nested keys.
//!
//! ## Example TOML
//!
//! ```toml
//! log_level = "info"
//! log_format = "json"
//!
//! [client]
//! base_url = "https://analysis.example.com"
//! timeout_secs = 120
//!
//! [client.input]
//! max_file_bytes = 104857600
//!
//! [client.normalize]
//! strip_code_fences = true
//! ```
//!
//! The same base URL from the environment:
//! `LANGSCOPE__CLIENT__BASE_URL=https://analysis.example.com`.

use std::fmt;
use std::path::Path;

use anyhow::Context;
use client::{ClientConfig, ConfigError};
use serde::{Deserialize, Serialize};

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "LANGSCOPE";

/// Default settings file name, looked up without extension.
pub const DEFAULT_CONFIG_NAME: &str = "langscope";

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        })
    }
}

/// Everything the binary needs to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub client: ClientConfig,

    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            log_level: "warn".to_string(),
            log_format: LogFormat::Compact,
        }
    }
}

impl AppConfig {
    /// Loads settings from the standard sources.
    ///
    /// With `path` set the file must exist; otherwise a `langscope.*` file in
    /// the working directory is used when present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_from(
            path,
            ::config::Environment::with_prefix(ENV_PREFIX).separator("__"),
        )
    }

    /// Like [`AppConfig::load`] with an explicit environment source.
    pub fn load_from(path: Option<&Path>, env: ::config::Environment) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => ::config::File::from(path).required(true),
            None => ::config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let cfg: AppConfig = ::config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()
            .context("failed to read settings")?
            .try_deserialize()
            .context("invalid settings")?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.client.validate()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client.base_url = base_url.into();
        self
    }
}
