//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - loads the pipeline artifact once and owns it for the whole run
//! - hands the pipeline to the TUI or to the one-shot predictor

use std::path::Path;

use clap::Parser;

use crate::cli::{Command, OutputFormat, PredictArgs};
use crate::error::{AppError, ErrorKind};
use crate::locale::Strings;
use crate::logging::{self, Console};
use crate::models::{self, Classifier, EngagementPipeline};
use crate::report;

pub mod session;

use session::Session;

/// Entry point for the `engage` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let console = match cli.command {
        Command::Tui => Console::Off,
        Command::Predict(_) => Console::Stderr,
    };
    logging::init(cli.global.verbose, cli.global.log_file.as_deref(), console)?;

    let strings = cli.global.lang.strings();
    match cli.command {
        Command::Tui => with_pipeline(&cli.global.model, strings, |pipeline| crate::tui::run(pipeline, strings)),
        Command::Predict(args) => with_pipeline(&cli.global.model, strings, |pipeline| {
            println!("{}", predict_report(pipeline, &args, strings)?);
            Ok(())
        }),
    }
}

/// Load the artifact at `path` and run `body` with it.
///
/// If loading fails, `body` is never called: the error carries the localized
/// halt message and nothing else is shown.
pub fn with_pipeline<T>(
    path: &Path,
    strings: &Strings,
    body: impl FnOnce(&EngagementPipeline) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let pipeline = match models::load(path) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            tracing::error!(error = %err, "pipeline unavailable, halting");
            return Err(AppError::artifact_missing(format!(
                "{}\n({err})",
                strings.artifact_missing(&path.display().to_string())
            )));
        }
    };
    body(&pipeline)
}

/// Run a single prediction from command-line values and format the output.
pub fn predict_report<C: Classifier + ?Sized>(
    pipeline: &C,
    args: &PredictArgs,
    strings: &'static Strings,
) -> Result<String, AppError> {
    let form = args
        .to_form()
        .ok_or_else(|| AppError::new(ErrorKind::Usage, "Age or family size out of range."))?;

    let mut session = Session::with_form(pipeline, strings, form);
    let record = session.record();
    let rendered = session.predict_now()?;

    match args.format {
        OutputFormat::Json => report::prediction_json(&record, &rendered),
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str(strings.title);
            out.push_str("\n\n");
            out.push_str(&report::format_input_record(&record, strings));
            out.push('\n');
            out.push_str(&report::format_prediction(&rendered, strings));
            Ok(out)
        }
    }
}

/// Rewrite argv so `engage` defaults to `engage tui`.
///
/// Rules:
/// - `engage`                        -> `engage tui`
/// - `engage --lang id ...`          -> `engage tui --lang id ...`
/// - `engage --help/--version/-h`    -> unchanged (show top-level help/version)
/// - any argv naming a subcommand    -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let names_subcommand = argv[1..].iter().any(|a| matches!(a.as_str(), "tui" | "predict"));
    if names_subcommand {
        return argv;
    }

    // Only flags: treat them as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is and let clap report the error.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::locale::Locale;
    use crate::models::FORMAT_VERSION;
    use std::cell::Cell;
    use std::io::Write;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn predict_args(extra: &[&str]) -> PredictArgs {
        let mut argv = vec!["engage", "predict"];
        argv.extend_from_slice(extra);
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Command::Predict(a) => a,
            Command::Tui => panic!("expected predict"),
        }
    }

    #[test]
    fn rewrite_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["engage"])), args(&["engage", "tui"]));
        assert_eq!(
            rewrite_args(args(&["engage", "--lang", "id"])),
            args(&["engage", "tui", "--lang", "id"])
        );
        assert_eq!(
            rewrite_args(args(&["engage", "--lang", "id", "predict"])),
            args(&["engage", "--lang", "id", "predict"])
        );
        assert_eq!(rewrite_args(args(&["engage", "--help"])), args(&["engage", "--help"]));
    }

    #[test]
    fn missing_artifact_never_reaches_the_ui() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engagement_model.json");
        let reached = Cell::new(false);

        let err = with_pipeline(&path, Locale::En.strings(), |_| {
            reached.set(true);
            Ok(())
        })
        .unwrap_err();

        assert!(!reached.get());
        assert_eq!(err.kind(), ErrorKind::ArtifactMissing);
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().starts_with("Model file '"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn halt_message_is_localized() {
        let dir = tempfile::tempdir().unwrap();
        let err = with_pipeline(&dir.path().join("nope.json"), Locale::Id.strings(), |_| Ok(())).unwrap_err();
        assert!(err.to_string().contains("tidak ditemukan"));
    }

    #[test]
    fn loaded_pipeline_is_handed_to_the_body() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let artifact = crate::models::artifact::sample_artifact();
        assert_eq!(artifact.format_version, FORMAT_VERSION);
        file.write_all(serde_json::to_string(&artifact).unwrap().as_bytes()).unwrap();

        let classes = with_pipeline(file.path(), Locale::En.strings(), |p| Ok(p.classes().to_vec())).unwrap();
        assert_eq!(classes.len(), 3);
    }

    #[test]
    fn medium_scenario_text_report() {
        let stub = crate::inference::tests::StubPipeline::new(
            "Medium",
            &[("Low", 0.2), ("Medium", 0.6), ("High", 0.2)],
        );
        let text = predict_report(&stub, &predict_args(&[]), Locale::En.strings()).unwrap();
        assert!(text.contains("Customer Data Input:"));
        assert!(text.contains("[WARNING] Engagement Level: Medium 😐"));
        assert!(!text.contains("[SUCCESS]") && !text.contains("[ALERT]"));
        assert!(text.contains("0.6000"));
    }

    #[test]
    fn json_report_for_the_real_pipeline() {
        let pipeline = EngagementPipeline::from_artifact(crate::models::artifact::sample_artifact()).unwrap();
        let out = predict_report(&pipeline, &predict_args(&["--format", "json", "--age", "60"]), Locale::En.strings())
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["input"]["Age"], 60);
        assert_eq!(json["rows"].as_array().unwrap().len(), 3);
    }
}
