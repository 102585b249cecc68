//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - sets up logging and reads settings
//! - loads the model/encoder artifacts once
//! - collects a property (flags, JSON file, or the interactive form)
//! - runs the prediction pipeline and prints/exports the result

use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, OutputArgs, PredictArgs};
use crate::config::Settings;
use crate::domain::PropertyDetails;
use crate::error::{AppError, EXIT_INPUT};
use crate::geo::NominatimGeocoder;
use crate::io::Artifacts;

use self::pipeline::Estimator;

pub mod pipeline;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Entry point for the `estimate` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();

    // `estimate` on its own opens the form.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let mut settings = Settings::from_env()?;
    if let Some(dir) = cli.artifacts {
        settings.artifacts_dir = dir;
    }

    let artifacts = Artifacts::load(&settings.artifacts_dir)?;

    match cli.command {
        Command::Inspect => {
            println!("{}", crate::report::format_artifacts(&artifacts));
            Ok(())
        }
        Command::Predict(args) => {
            let estimator = Estimator::new(artifacts, NominatimGeocoder::from_settings(&settings)?);
            handle_predict(&estimator, args)
        }
        Command::Form(output) => {
            let estimator = Estimator::new(artifacts, NominatimGeocoder::from_settings(&settings)?);
            handle_form(&estimator, &output)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // stdout carries results (and `--json`), so logs go to stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_predict(estimator: &Estimator<NominatimGeocoder>, args: PredictArgs) -> Result<(), AppError> {
    let details = match &args.input {
        Some(path) => crate::io::read_property_details(path)?,
        None => PropertyDetails::from(args.property),
    };
    predict_and_print(estimator, &details, &args.output)
}

fn handle_form(estimator: &Estimator<NominatimGeocoder>, output: &OutputArgs) -> Result<(), AppError> {
    // Prompts go to stderr so `estimate form --json > out.json` works.
    let stdin = std::io::stdin();
    let details = crate::cli::form::collect_property(stdin.lock(), std::io::stderr())?;
    eprintln!("\n{}", crate::report::format_input_summary(&details));
    predict_and_print(estimator, &details, output)
}

fn predict_and_print(
    estimator: &Estimator<NominatimGeocoder>,
    details: &PropertyDetails,
    output: &OutputArgs,
) -> Result<(), AppError> {
    let estimate = estimator.estimate(details)?;

    if output.json {
        let json = serde_json::to_string_pretty(&estimate.result)
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to serialize result: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", crate::report::format_prediction(&estimate.result));
    }

    if let Some(path) = &output.export {
        export_report(path, details, &estimate)?;
    }
    Ok(())
}

fn export_report(path: &Path, details: &PropertyDetails, estimate: &pipeline::Estimate) -> Result<(), AppError> {
    let report = crate::io::PredictionReport::new(details, estimate);
    crate::io::write_report_json(path, &report)?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}

/// Rewrite argv so `estimate` defaults to `estimate form`.
///
/// Rules:
/// - `estimate`                          -> `estimate form`
/// - `estimate --artifacts DIR ...`      -> `estimate form --artifacts DIR ...`
/// - `estimate --help/--version/-h`      -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("form".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    // Flags before any subcommand are form flags.
    if arg1.starts_with('-') {
        argv.insert(1, "form".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_the_form() {
        assert_eq!(rewrite_args(argv(&["estimate"])), argv(&["estimate", "form"]));
    }

    #[test]
    fn leading_flags_go_to_the_form() {
        assert_eq!(
            rewrite_args(argv(&["estimate", "--artifacts", "models", "--json"])),
            argv(&["estimate", "form", "--artifacts", "models", "--json"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            argv(&["estimate", "predict", "--zip-code", "1000"]),
            argv(&["estimate", "inspect"]),
            argv(&["estimate", "--help"]),
            argv(&["estimate", "-V"]),
        ] {
            assert_eq!(rewrite_args(args.clone()), args);
        }
    }

    #[test]
    fn rewritten_args_parse() {
        let cli = crate::cli::Cli::try_parse_from(rewrite_args(argv(&["estimate", "--export", "r.json"]))).unwrap();
        match cli.command {
            Command::Form(out) => assert_eq!(out.export.as_deref(), Some(Path::new("r.json"))),
            other => panic!("expected form, got {other:?}"),
        }
    }
}
