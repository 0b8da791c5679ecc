//! langscope
//!
//! Client for a remote language-analysis service. Text or a media file goes
//! in; the detected language, a confidence, a translation or summary, the
//! processing time and (for media) a transcription come out.
//!
//! The work is split across the workspace crates, re-exported here:
//!
//! - [`input`]: what can be submitted and the checks it must pass.
//! - [`normalize`]: tolerant decoding of whatever the service put in its
//!   result field, down to a [`CanonicalResult`].
//! - [`present`]: display strings and placeholders, as a [`DisplayModel`].
//! - [`client`]: the single-flight [`AnalysisClient`] that ties them together
//!   over HTTP.
//!
//! This crate adds layered settings ([`AppConfig`]), terminal rendering
//! ([`render`]), a stderr loading indicator ([`StatusLine`]) and logging setup.
//!
//! ```no_run
//! use langscope::{render, AnalysisClient, AnalysisInput, AppConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let cfg = AppConfig::load(None)?;
//! let client = AnalysisClient::new(cfg.client)?;
//! let model = client.submit(AnalysisInput::text("Bonjour")).await?;
//! print!("{}", render::render_text(&model));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod render;
mod status;

pub use client::{
    AnalysisBackend, AnalysisClient, ClientConfig, HttpBackend, LoadingObserver, NoopObserver,
    Outcome, RequestState, ServiceResponse, SubmitError, TransportError,
};
pub use input::{AnalysisInput, FileInput, InputConfig, InputKind, ValidationError};
pub use normalize::{normalize, CanonicalResult, NormalizeConfig, RawResultPayload};
pub use present::{present, DisplayModel, Transcription};

pub use crate::config::{AppConfig, LogFormat};
pub use crate::status::{finished_message, started_message};
#[cfg(feature = "cli")]
pub use crate::status::StatusLine;

/// Installs the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `cfg.log_level`. Calling it twice is harmless.
#[cfg(feature = "cli")]
pub fn init_logging(cfg: &AppConfig) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = match cfg.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
    if installed.is_ok() {
        log_settings(cfg);
    }
}

/// Records the effective settings. Runs once the subscriber exists, since the
/// settings have to be loaded before logging can be configured.
#[cfg(feature = "cli")]
fn log_settings(cfg: &AppConfig) {
    tracing::debug!(
        base_url = %cfg.client.base_url,
        log_level = %cfg.log_level,
        log_format = %cfg.log_format,
        "config_loaded"
    );
}
