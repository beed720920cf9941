//! Test helpers for composing layered ingest configuration.

use super::*;
use ortho_config::{MergeComposer, sanitize_value};

/// Options supplied by a configuration file or the environment.
#[derive(Debug, Clone, Default, Serialize)]
pub(super) struct LayerOverrides {
    pub(super) database_path: Option<Utf8PathBuf>,
    pub(super) variant: Option<String>,
    pub(super) step_meters: Option<f64>,
}

/// Merge file, environment and parsed CLI layers in precedence order, then
/// resolve the result the way `ingest` does.
pub(super) fn merge_layers(
    cli_args: &IngestArgs,
    file_layer: Option<&LayerOverrides>,
    env_layer: Option<&LayerOverrides>,
) -> Result<PipelineConfig, CliError> {
    let mut composer = MergeComposer::new();
    if let Some(layer) = file_layer {
        composer.push_file(sanitize_value(layer).map_err(CliError::Configuration)?, None);
    }
    if let Some(layer) = env_layer {
        composer.push_environment(sanitize_value(layer).map_err(CliError::Configuration)?);
    }
    composer.push_cli(sanitize_value(cli_args).map_err(CliError::Configuration)?);
    config_from_layers(composer.layers())
}
