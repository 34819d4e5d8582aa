//! Run one record through a pipeline and validate what comes back.

use crate::domain::{ClassProbability, EngagementLevel, InputRecord, PredictionResult};
use crate::error::AppError;
use crate::models::Classifier;

/// Maximum deviation of the probability sum from 1.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Classify `record` and attach the full class distribution.
///
/// The record is consumed: each prediction request owns exactly one record.
/// Any mismatch between the pipeline's output and its declared classes is an
/// `Inference` error; retrying the same record would fail the same way.
pub fn predict<C: Classifier + ?Sized>(pipeline: &C, record: InputRecord) -> Result<PredictionResult, AppError> {
    let label = pipeline.classify(&record)?;
    let probs = pipeline.class_probabilities(&record)?;
    let classes = pipeline.classes();

    if probs.len() != classes.len() {
        return Err(AppError::inference(format!(
            "Pipeline returned {} probabilities for {} classes.",
            probs.len(),
            classes.len()
        )));
    }
    if !classes.iter().any(|c| *c == label) {
        return Err(AppError::inference(format!(
            "Pipeline predicted '{label}', which is not one of its classes."
        )));
    }

    let level = parse_level(&label)?;

    let mut probabilities = Vec::with_capacity(classes.len());
    for (class, &p) in classes.iter().zip(&probs) {
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(AppError::inference(format!(
                "Pipeline returned probability {p} for class '{class}'."
            )));
        }
        probabilities.push(ClassProbability {
            level: parse_level(class)?,
            probability: p,
        });
    }

    let total: f64 = probs.iter().sum();
    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(AppError::inference(format!(
            "Pipeline probabilities sum to {total}, not 1."
        )));
    }

    tracing::debug!(level = level.label(), ?probs, "prediction");
    Ok(PredictionResult { level, probabilities })
}

fn parse_level(label: &str) -> Result<EngagementLevel, AppError> {
    EngagementLevel::parse(label).ok_or_else(|| {
        AppError::inference(format!(
            "Unknown engagement level '{label}' (expected Low, Medium or High)."
        ))
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{Choice, Education, Gender, MonthlyIncome, Occupation};
    use crate::error::ErrorKind;
    use crate::input::InputForm;
    use crate::models::EngagementPipeline;
    use crate::models::artifact::sample_artifact;
    use std::cell::Cell;

    /// A pipeline that returns canned answers and counts calls.
    pub(crate) struct StubPipeline {
        pub classes: Vec<String>,
        pub label: String,
        pub probs: Vec<f64>,
        pub calls: Cell<usize>,
    }

    impl StubPipeline {
        pub(crate) fn new(label: &str, dist: &[(&str, f64)]) -> Self {
            Self {
                classes: dist.iter().map(|(c, _)| c.to_string()).collect(),
                label: label.to_string(),
                probs: dist.iter().map(|(_, p)| *p).collect(),
                calls: Cell::new(0),
            }
        }
    }

    impl Classifier for StubPipeline {
        fn classes(&self) -> &[String] {
            &self.classes
        }

        fn classify(&self, _record: &InputRecord) -> Result<String, AppError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.label.clone())
        }

        fn class_probabilities(&self, _record: &InputRecord) -> Result<Vec<f64>, AppError> {
            Ok(self.probs.clone())
        }
    }

    #[test]
    fn stub_medium_round_trips() {
        let stub = StubPipeline::new("Medium", &[("Low", 0.2), ("Medium", 0.6), ("High", 0.2)]);
        let result = predict(&stub, InputForm::default().collect()).unwrap();
        assert_eq!(result.level, EngagementLevel::Medium);
        assert_eq!(result.probabilities.len(), 3);
        assert_eq!(result.probability_of(EngagementLevel::Medium), Some(0.6));
        assert_eq!(stub.calls.get(), 1);
    }

    #[test]
    fn real_pipeline_is_deterministic_and_normalized() {
        let pipeline = EngagementPipeline::from_artifact(sample_artifact()).unwrap();
        for &gender in Gender::ALL {
            for &occupation in Occupation::ALL {
                for &education in Education::ALL {
                    for &monthly_income in MonthlyIncome::ALL {
                        let form = InputForm {
                            gender,
                            occupation,
                            education,
                            monthly_income,
                            ..InputForm::default()
                        };
                        let a = predict(&pipeline, form.collect()).unwrap();
                        let b = predict(&pipeline, form.collect()).unwrap();
                        assert_eq!(a, b);

                        assert_eq!(a.probabilities.len(), pipeline.classes().len());
                        for level in EngagementLevel::ALL {
                            let n = a.probabilities.iter().filter(|p| p.level == level).count();
                            assert_eq!(n, 1);
                        }
                        let total: f64 = a.probabilities.iter().map(|p| p.probability).sum();
                        assert!((total - 1.0).abs() < PROBABILITY_TOLERANCE);
                    }
                }
            }
        }
    }

    #[test]
    fn unknown_label_fails_loudly() {
        let stub = StubPipeline::new(
            "Very High",
            &[("Low", 0.1), ("Medium", 0.1), ("High", 0.1), ("Very High", 0.7)],
        );
        let err = predict(&stub, InputForm::default().collect()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Inference);
        assert!(err.to_string().contains("Very High"));
    }

    #[test]
    fn label_outside_class_list_is_rejected() {
        let stub = StubPipeline::new("High", &[("Low", 0.5), ("Medium", 0.5)]);
        assert!(predict(&stub, InputForm::default().collect()).is_err());
    }

    #[test]
    fn bad_distributions_are_rejected() {
        let short = StubPipeline {
            probs: vec![0.5, 0.5],
            ..StubPipeline::new("Low", &[("Low", 0.4), ("Medium", 0.3), ("High", 0.3)])
        };
        assert!(predict(&short, InputForm::default().collect()).is_err());

        let unnormalized = StubPipeline::new("Low", &[("Low", 0.5), ("Medium", 0.3), ("High", 0.3)]);
        let err = predict(&unnormalized, InputForm::default().collect()).unwrap_err();
        assert!(err.to_string().contains("sum"));

        let nan = StubPipeline::new("Low", &[("Low", f64::NAN), ("Medium", 0.5), ("High", 0.5)]);
        assert!(predict(&nan, InputForm::default().collect()).is_err());
    }
}
