//! Behaviour-driven step definitions driving the ingest CLI scenarios.

use super::helpers::{LayerOverrides, merge_layers};
use super::*;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

#[derive(Debug, Default)]
struct IngestWorld {
    cli_args: RefCell<Vec<String>>,
    cli_result: RefCell<Option<Result<PipelineConfig, CliError>>>,
    config_layer: RefCell<Option<LayerOverrides>>,
    env_layer: RefCell<Option<LayerOverrides>>,
}

impl IngestWorld {
    fn config(&self) -> PipelineConfig {
        self.cli_result
            .borrow()
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect("expected success")
            .clone()
    }
}

fn variant_named(name: &str) -> Variant {
    [
        Variant::RtreeMidpoint,
        Variant::IndexedMidpoint,
        Variant::Interpolated,
    ]
    .into_iter()
    .find(|variant| variant.name() == name)
    .unwrap_or_else(|| panic!("unknown variant {name}"))
}

#[fixture]
fn world() -> IngestWorld {
    IngestWorld::default()
}

#[given("no command-line arguments")]
fn no_arguments(#[from(world)] world: &IngestWorld) {
    world.cli_args.borrow_mut().clear();
}

#[given("the arguments {line}")]
fn arguments(#[from(world)] world: &IngestWorld, line: String) {
    let mut guard = world.cli_args.borrow_mut();
    guard.clear();
    guard.extend(line.trim_matches('"').split_whitespace().map(str::to_owned));
}

#[given("a configuration file selecting the {variant} variant with a {step} metre step")]
fn configuration_file_selects(#[from(world)] world: &IngestWorld, variant: String, step: f64) {
    world.config_layer.replace(Some(LayerOverrides {
        database_path: Some(Utf8PathBuf::from("from-file/speed_limits.sqlite")),
        variant: Some(variant),
        step_meters: Some(step),
    }));
}

#[given("the environment selects the {variant} variant")]
fn environment_selects(#[from(world)] world: &IngestWorld, variant: String) {
    world.env_layer.replace(Some(LayerOverrides {
        database_path: Some(Utf8PathBuf::from("from-env/speed_limits.sqlite")),
        variant: Some(variant),
        ..LayerOverrides::default()
    }));
}

#[when("I configure the ingest command")]
fn configure_ingest(#[from(world)] world: &IngestWorld) {
    let mut invocation = vec!["speedlimits".to_owned()];
    invocation.extend(world.cli_args.borrow().iter().cloned());
    let file_layer = world.config_layer.borrow().clone();
    let env_layer = world.env_layer.borrow().clone();
    let outcome = Cli::try_parse_from(invocation)
        .map_err(CliError::ArgumentParsing)
        .and_then(|cli| {
            let args = match cli.command {
                Some(Command::Ingest(args)) => args,
                None => IngestArgs::default(),
            };
            merge_layers(&args, file_layer.as_ref(), env_layer.as_ref())
        });
    world.cli_result.replace(Some(outcome));
}

#[then("the plan targets the Bavarian extract with the interpolated variant")]
fn plan_uses_defaults(#[from(world)] world: &IngestWorld) {
    let config = world.config();
    assert_eq!(config.archive_url, DEFAULT_ARCHIVE_URL);
    assert_eq!(config.archive_path.as_str(), DEFAULT_ARCHIVE_PATH);
    assert_eq!(config.database_path.as_str(), DEFAULT_DATABASE_PATH);
    assert_eq!(config.variant, Variant::Interpolated);
    assert_eq!(config.step, StepDistance::default());
}

#[then("the plan uses the {variant} variant with a {step} metre step")]
fn plan_uses_variant_and_step(#[from(world)] world: &IngestWorld, variant: String, step: f64) {
    let config = world.config();
    assert_eq!(config.variant, variant_named(&variant));
    assert_eq!(config.step.meters(), step);
}

#[then("the database path comes from the {layer}")]
fn database_path_from(#[from(world)] world: &IngestWorld, layer: String) {
    let expected = match layer.as_str() {
        "configuration file" => "from-file/speed_limits.sqlite",
        "environment" => "from-env/speed_limits.sqlite",
        other => panic!("unknown layer {other}"),
    };
    assert_eq!(world.config().database_path.as_str(), expected);
}

#[then("the CLI reports that the \"step-meters\" value is invalid")]
fn reports_invalid_step(#[from(world)] world: &IngestWorld) {
    let borrowed = world.cli_result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::InvalidStep { field, .. } => assert_eq!(*field, ARG_STEP_METERS),
        other => panic!("unexpected error {other:?}"),
    }
}

#[then("the CLI reports an argument error")]
fn reports_argument_error(#[from(world)] world: &IngestWorld) {
    let borrowed = world.cli_result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    assert!(
        matches!(error, CliError::ArgumentParsing(_)),
        "unexpected error {error:?}"
    );
}

macro_rules! register_ingest_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/ingest_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: IngestWorld) {
            let _ = world;
        }
    };
}

register_ingest_scenario!(bare_invocation, "running without arguments");
register_ingest_scenario!(
    cli_variant_selection,
    "choosing a variant and step on the command line"
);
register_ingest_scenario!(rejecting_zero_step, "rejecting a zero step");
register_ingest_scenario!(rejecting_unknown_variant, "rejecting an unknown variant");
register_ingest_scenario!(
    config_file_layer_applies,
    "reading options from a configuration file"
);
register_ingest_scenario!(
    env_layer_overrides_file,
    "environment values override the configuration file"
);
register_ingest_scenario!(
    cli_layer_overrides_all,
    "command-line flags override the environment and the configuration file"
);
