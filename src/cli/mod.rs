//! Command-line parsing for the engagement predictor.
//!
//! Argument parsing and command dispatch stay separate from the pipeline and
//! rendering code.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::domain::{Age, Education, FamilySize, Gender, MaritalStatus, MonthlyIncome, Occupation};
use crate::input::InputForm;
use crate::locale::Locale;
use crate::models::DEFAULT_ARTIFACT_PATH;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "engage", version, about = "Customer engagement prediction (High / Medium / Low)")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct GlobalArgs {
    /// Pipeline artifact to load.
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_ARTIFACT_PATH)]
    pub model: PathBuf,

    /// UI language.
    #[arg(long, global = true, value_enum, default_value_t = Locale::En)]
    pub lang: Locale,

    /// Write logs to this file (the TUI otherwise logs nowhere).
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// More log output (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive form (default).
    Tui,
    /// Predict once from flags and print the result.
    Predict(PredictArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Form values for a one-shot prediction. Defaults match the interactive form.
#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[arg(long, default_value_t = Age::DEFAULT,
          value_parser = clap::value_parser!(u8).range(i64::from(Age::MIN)..=i64::from(Age::MAX)))]
    pub age: u8,

    #[arg(long, value_enum, default_value_t = Gender::default())]
    pub gender: Gender,

    #[arg(long, value_enum, default_value_t = MaritalStatus::default())]
    pub marital_status: MaritalStatus,

    #[arg(long, value_enum, default_value_t = Occupation::default())]
    pub occupation: Occupation,

    #[arg(long, value_enum, default_value_t = MonthlyIncome::default())]
    pub monthly_income: MonthlyIncome,

    #[arg(long, value_enum, default_value_t = Education::default())]
    pub education: Education,

    #[arg(long, default_value_t = FamilySize::DEFAULT,
          value_parser = clap::value_parser!(u8).range(i64::from(FamilySize::MIN)..=i64::from(FamilySize::MAX)))]
    pub family_size: u8,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl PredictArgs {
    /// Build the form; `None` only if a bounded value slipped past clap.
    pub fn to_form(&self) -> Option<InputForm> {
        Some(InputForm {
            age: Age::new(self.age)?,
            gender: self.gender,
            marital_status: self.marital_status,
            occupation: self.occupation,
            monthly_income: self.monthly_income,
            education: self.education,
            family_size: FamilySize::new(self.family_size)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("engage").chain(args.iter().copied()))
    }

    #[test]
    fn predict_defaults_equal_form_defaults() {
        let cli = parse(&["predict"]).unwrap();
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(args.to_form(), Some(InputForm::default()));
        assert_eq!(cli.global.model, PathBuf::from(DEFAULT_ARTIFACT_PATH));
        assert_eq!(cli.global.lang, Locale::En);
    }

    #[test]
    fn predict_parses_every_field() {
        let cli = parse(&[
            "--lang", "id", "predict", "--age", "40", "--gender", "male", "--marital-status",
            "prefer-not-to-say", "--occupation", "self-employed", "--monthly-income", "above-50000",
            "--education", "phd", "--family-size", "6", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.global.lang, Locale::Id);
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        let form = args.to_form().unwrap();
        assert_eq!(form.age.get(), 40);
        assert_eq!(form.occupation, Occupation::SelfEmployed);
        assert_eq!(form.monthly_income, MonthlyIncome::MoreThan50000);
        assert_eq!(form.education, Education::PhD);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn out_of_range_values_are_rejected_by_clap() {
        assert!(parse(&["predict", "--age", "17"]).is_err());
        assert!(parse(&["predict", "--family-size", "11"]).is_err());
        assert!(parse(&["predict", "--occupation", "astronaut"]).is_err());
    }
}
