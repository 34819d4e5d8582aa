//! Evaluation of a fitted pipeline.
//!
//! Two steps, mirroring how the artifact was fitted:
//! - encode: scale numeric columns, one-hot categorical columns
//! - classify: softmax over `W·x + b`
//!
//! Parameters are validated once in [`EngagementPipeline::from_artifact`];
//! evaluation only fails when a record does not match the fitted schema.

use std::collections::HashSet;

use nalgebra::{DMatrix, DVector};

use crate::domain::{EngagementLevel, FeatureValue, InputRecord};
use crate::error::AppError;
use crate::models::Classifier;
use crate::models::artifact::{CategoricalColumn, NumericColumn, PipelineArtifact};

/// A loaded, validated pipeline. Read-only after construction.
#[derive(Debug, Clone)]
pub struct EngagementPipeline {
    classes: Vec<String>,
    numeric: Vec<NumericColumn>,
    categorical: Vec<CategoricalColumn>,
    weights: DMatrix<f64>,
    intercepts: DVector<f64>,
}

impl EngagementPipeline {
    pub fn from_artifact(artifact: PipelineArtifact) -> Result<Self, AppError> {
        validate_classes(&artifact.classes)?;

        for col in &artifact.numeric {
            if !(col.mean.is_finite() && col.scale.is_finite() && col.scale > 0.0) {
                return Err(AppError::artifact_missing(format!(
                    "numeric column '{}' has invalid scaling (mean={}, scale={})",
                    col.name, col.mean, col.scale
                )));
            }
        }
        for col in &artifact.categorical {
            if col.categories.is_empty() {
                return Err(AppError::artifact_missing(format!(
                    "categorical column '{}' has no categories",
                    col.name
                )));
            }
        }

        let n_classes = artifact.classes.len();
        let width = artifact.encoded_width();
        if artifact.coefficients.len() != n_classes {
            return Err(AppError::artifact_missing(format!(
                "{} coefficient rows for {n_classes} classes",
                artifact.coefficients.len()
            )));
        }
        if let Some((i, row)) = artifact
            .coefficients
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != width)
        {
            return Err(AppError::artifact_missing(format!(
                "coefficient row {i} has {} entries, expected {width}",
                row.len()
            )));
        }
        if artifact.intercepts.len() != n_classes {
            return Err(AppError::artifact_missing(format!(
                "{} intercepts for {n_classes} classes",
                artifact.intercepts.len()
            )));
        }

        let flat: Vec<f64> = artifact.coefficients.iter().flatten().copied().collect();
        if !flat.iter().chain(artifact.intercepts.iter()).all(|v| v.is_finite()) {
            return Err(AppError::artifact_missing("non-finite classifier parameter"));
        }

        Ok(Self {
            weights: DMatrix::from_row_slice(n_classes, width, &flat),
            intercepts: DVector::from_vec(artifact.intercepts),
            classes: artifact.classes,
            numeric: artifact.numeric,
            categorical: artifact.categorical,
        })
    }

    pub fn encoded_width(&self) -> usize {
        self.weights.ncols()
    }

    /// Column names the pipeline reads from a record.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.numeric
            .iter()
            .map(|c| c.name.as_str())
            .chain(self.categorical.iter().map(|c| c.name.as_str()))
    }

    /// Turn a record into the encoded feature vector.
    pub fn encode(&self, record: &InputRecord) -> Result<DVector<f64>, AppError> {
        let mut x = DVector::zeros(self.encoded_width());

        for (i, col) in self.numeric.iter().enumerate() {
            let value = match record.feature(&col.name) {
                Some(FeatureValue::Numeric(v)) => v,
                Some(FeatureValue::Category(_)) => {
                    return Err(AppError::inference(format!(
                        "Column '{}' is categorical in the record but numeric in the model.",
                        col.name
                    )));
                }
                None => return Err(missing_column(&col.name)),
            };
            x[i] = (value - col.mean) / col.scale;
        }

        let mut offset = self.numeric.len();
        for col in &self.categorical {
            let value = match record.feature(&col.name) {
                Some(FeatureValue::Category(v)) => v,
                Some(FeatureValue::Numeric(_)) => {
                    return Err(AppError::inference(format!(
                        "Column '{}' is numeric in the record but categorical in the model.",
                        col.name
                    )));
                }
                None => return Err(missing_column(&col.name)),
            };
            let Some(pos) = col.categories.iter().position(|c| c == value) else {
                return Err(AppError::inference(format!(
                    "Unknown category '{value}' for column '{}'.",
                    col.name
                )));
            };
            x[offset + pos] = 1.0;
            offset += col.categories.len();
        }

        Ok(x)
    }

    fn probabilities(&self, record: &InputRecord) -> Result<DVector<f64>, AppError> {
        let x = self.encode(record)?;
        let logits = &self.weights * x + &self.intercepts;
        Ok(softmax(&logits))
    }
}

impl Classifier for EngagementPipeline {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn classify(&self, record: &InputRecord) -> Result<String, AppError> {
        let p = self.probabilities(record)?;
        // First maximum wins on ties.
        let best = p
            .iter()
            .enumerate()
            .fold(0, |best, (i, v)| if *v > p[best] { i } else { best });
        Ok(self.classes[best].clone())
    }

    fn class_probabilities(&self, record: &InputRecord) -> Result<Vec<f64>, AppError> {
        Ok(self.probabilities(record)?.iter().copied().collect())
    }
}

fn validate_classes(classes: &[String]) -> Result<(), AppError> {
    if classes.is_empty() {
        return Err(AppError::artifact_missing("no classes"));
    }
    let mut seen = HashSet::new();
    for label in classes {
        if EngagementLevel::parse(label).is_none() {
            return Err(AppError::artifact_missing(format!(
                "unknown class label '{label}' (expected Low, Medium or High)"
            )));
        }
        if !seen.insert(label.as_str()) {
            return Err(AppError::artifact_missing(format!("duplicate class label '{label}'")));
        }
    }
    Ok(())
}

fn missing_column(name: &str) -> AppError {
    AppError::inference(format!("The model expects column '{name}', which the input record does not have."))
}

/// Numerically stable softmax.
fn softmax(logits: &DVector<f64>) -> DVector<f64> {
    let max = logits.max();
    let exp = logits.map(|v| (v - max).exp());
    let total = exp.sum();
    exp / total
}
