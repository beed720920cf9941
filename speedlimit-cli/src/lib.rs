//! Command-line interface for the speed-limit extractor.
#![forbid(unsafe_code)]

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use speedlimit_core::{StepDistance, Variant};
use speedlimit_data::{
    ArchiveSource, DEFAULT_ARCHIVE_PATH, DEFAULT_ARCHIVE_URL, DEFAULT_DATABASE_PATH,
    HttpArchiveSource, IngestReport, PipelineConfig, run_pipeline,
};

mod error;

pub use error::CliError;

const ARG_STEP_METERS: &str = "step-meters";

/// Run the CLI with the current process arguments and environment.
///
/// Without a subcommand the `ingest` defaults apply, so a bare invocation
/// downloads the Bavarian extract and loads it with the default variant.
pub fn run() -> Result<IngestReport, CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let args = match cli.command {
        Some(Command::Ingest(args)) => args,
        None => IngestArgs::default(),
    };
    let config = args.into_config()?;
    let source =
        HttpArchiveSource::new().map_err(|source| CliError::HttpClient { source })?;
    execute(&config, &source)
}

fn execute<S: ArchiveSource + ?Sized>(
    config: &PipelineConfig,
    source: &S,
) -> Result<IngestReport, CliError> {
    debug!("Resolved configuration: {config:?}");
    Ok(run_pipeline(config, source)?)
}

#[derive(Debug, Parser)]
#[command(
    name = "speedlimits",
    about = "Extract OpenStreetMap speed limits into SQLite",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Download the extract if needed and rebuild the speed-limit table.
    Ingest(IngestArgs),
}

/// Storage and sampling combinations selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum VariantArg {
    /// One midpoint per way, mirrored into an R*Tree index.
    RtreeMidpoint,
    /// One midpoint per way with B-tree indexes on lat and lon.
    IndexedMidpoint,
    /// A point every few meters along each way.
    Interpolated,
}

impl From<VariantArg> for Variant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::RtreeMidpoint => Self::RtreeMidpoint,
            VariantArg::IndexedMidpoint => Self::IndexedMidpoint,
            VariantArg::Interpolated => Self::Interpolated,
        }
    }
}

/// CLI arguments for the `ingest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "ingest",
    long_about = "Download the OSM extract when it is missing, then drop and \
                 rebuild the speed-limit table. Every option can also come \
                 from a configuration file or environment variables.",
    about = "Rebuild the speed-limit table from an OSM extract"
)]
#[ortho_config(prefix = "SPEEDLIMITS")]
struct IngestArgs {
    /// URL of the OSM PBF extract.
    #[arg(long, value_name = "url")]
    #[serde(default)]
    archive_url: Option<String>,
    /// Where the extract is stored locally.
    #[arg(long, value_name = "path")]
    #[serde(default)]
    archive_path: Option<Utf8PathBuf>,
    /// Destination SQLite database.
    #[arg(long, value_name = "path")]
    #[serde(default)]
    database_path: Option<Utf8PathBuf>,
    /// Storage layout and sampling strategy.
    #[arg(long, value_enum)]
    #[serde(default)]
    variant: Option<VariantArg>,
    /// Spacing of interpolated samples in meters, at least 0.01.
    #[arg(long = ARG_STEP_METERS, value_name = "meters")]
    #[serde(default)]
    step_meters: Option<f64>,
}

impl IngestArgs {
    fn into_config(self) -> Result<PipelineConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        merged.resolve()
    }

    /// Fill unset options with the built-in defaults and validate the step.
    fn resolve(self) -> Result<PipelineConfig, CliError> {
        let step = match self.step_meters {
            Some(meters) => StepDistance::new(meters).map_err(|source| CliError::InvalidStep {
                field: ARG_STEP_METERS,
                source,
            })?,
            None => StepDistance::default(),
        };
        Ok(PipelineConfig {
            archive_url: self
                .archive_url
                .unwrap_or_else(|| DEFAULT_ARCHIVE_URL.to_owned()),
            archive_path: self
                .archive_path
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_ARCHIVE_PATH)),
            database_path: self
                .database_path
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE_PATH)),
            variant: self.variant.map(Variant::from).unwrap_or_default(),
            step,
        })
    }
}

#[cfg(test)]
fn config_from_layers(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PipelineConfig, CliError> {
    let merged = IngestArgs::merge_from_layers(layers).map_err(CliError::Configuration)?;
    merged.resolve()
}

#[cfg(test)]
mod tests;
