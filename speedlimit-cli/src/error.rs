//! Error types emitted by the `speedlimits` CLI.

use std::sync::Arc;

use speedlimit_core::StepDistanceError;
use speedlimit_data::{PipelineError, TransportError};
use thiserror::Error;

/// Errors emitted by the `speedlimits` CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// The configured sampling step is unusable.
    #[error("invalid --{field}")]
    InvalidStep {
        /// Flag carrying the rejected value.
        field: &'static str,
        /// Why the value was rejected.
        #[source]
        source: StepDistanceError,
    },
    /// The HTTP client could not be set up.
    #[error("failed to prepare the archive download")]
    HttpClient {
        /// Transport construction failure.
        #[source]
        source: TransportError,
    },
    /// The extraction run failed.
    #[error("speed-limit extraction failed: {0}")]
    Pipeline(#[from] PipelineError),
}
