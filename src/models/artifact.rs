//! Read pipeline artifact files.
//!
//! The artifact is a JSON document describing a fitted pipeline:
//! - a preprocessing step (standard scaling for numeric columns, one-hot
//!   encoding for categorical columns)
//! - a multinomial logistic regression over the encoded feature vector
//!
//! The encoded vector is laid out as the numeric columns in order, followed by
//! one one-hot block per categorical column in order.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::Classifier;
use crate::models::pipeline::EngagementPipeline;

/// Default artifact location, relative to the working directory.
pub const DEFAULT_ARTIFACT_PATH: &str = "engagement_model.json";

/// The only artifact layout this build understands.
pub const FORMAT_VERSION: u32 = 1;

/// A numeric column and its standard-scaling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericColumn {
    pub name: String,
    pub mean: f64,
    pub scale: f64,
}

/// A categorical column and the categories seen at fit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalColumn {
    pub name: String,
    pub categories: Vec<String>,
}

/// On-disk schema of a fitted pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineArtifact {
    pub format_version: u32,
    /// Class labels in model order.
    pub classes: Vec<String>,
    pub numeric: Vec<NumericColumn>,
    pub categorical: Vec<CategoricalColumn>,
    /// One row per class, one column per encoded feature.
    pub coefficients: Vec<Vec<f64>>,
    /// One intercept per class.
    pub intercepts: Vec<f64>,
}

impl PipelineArtifact {
    /// Width of the encoded feature vector.
    pub fn encoded_width(&self) -> usize {
        self.numeric.len() + self.categorical.iter().map(|c| c.categories.len()).sum::<usize>()
    }
}

/// Load and validate the pipeline at `path`.
///
/// Any failure (absent file, invalid JSON, inconsistent parameters) is reported
/// as `ArtifactMissing`: the caller cannot continue without a usable pipeline.
pub fn load(path: &Path) -> Result<EngagementPipeline, AppError> {
    let artifact = read_artifact(path)?;
    let pipeline = EngagementPipeline::from_artifact(artifact)
        .map_err(|e| AppError::artifact_missing(format!("Model file '{}' is unusable: {e}", path.display())))?;

    tracing::info!(
        path = %path.display(),
        classes = ?pipeline.classes(),
        features = ?pipeline.feature_names().collect::<Vec<_>>(),
        width = pipeline.encoded_width(),
        "loaded pipeline artifact"
    );
    Ok(pipeline)
}

/// Read the raw artifact without validating its parameters.
pub fn read_artifact(path: &Path) -> Result<PipelineArtifact, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::artifact_missing(format!("Failed to open model file '{}': {e}", path.display())))?;
    let artifact: PipelineArtifact = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::artifact_missing(format!("Invalid model file '{}': {e}", path.display())))?;

    if artifact.format_version != FORMAT_VERSION {
        return Err(AppError::artifact_missing(format!(
            "Model file '{}' has format version {} (expected {FORMAT_VERSION}).",
            path.display(),
            artifact.format_version
        )));
    }

    Ok(artifact)
}

#[cfg(test)]
pub(crate) fn sample_artifact() -> PipelineArtifact {
    fn cat(name: &str, categories: &[&str]) -> CategoricalColumn {
        CategoricalColumn {
            name: name.to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    let numeric = vec![
        NumericColumn { name: "Age".to_string(), mean: 24.6, scale: 2.9 },
        NumericColumn { name: "Family size".to_string(), mean: 3.3, scale: 1.4 },
    ];
    let categorical = vec![
        cat("Gender", &["Female", "Male"]),
        cat("Marital Status", &["Married", "Prefer not to say", "Single"]),
        cat("Occupation", &["Employee", "House wife", "Self Employeed", "Student"]),
        cat(
            "Monthly Income",
            &["10001 to 25000", "25001 to 50000", "Below Rs.10000", "More than 50000", "No Income"],
        ),
        cat(
            "Educational Qualifications",
            &["Graduate", "Ph.D", "Post Graduate", "School", "Uneducated"],
        ),
    ];

    // Width = 2 numeric + 2 + 3 + 4 + 5 + 5 one-hot = 21.
    let mut high = vec![0.0; 21];
    let mut low = vec![0.0; 21];
    let mut medium = vec![0.0; 21];
    high[0] = 0.4;
    low[0] = -0.3;
    medium[1] = 0.2;
    high[5] = -0.5; // Marital Status = Prefer not to say
    low[10] = 0.8; // Occupation = Student
    medium[15] = 0.3; // Monthly Income = No Income

    PipelineArtifact {
        format_version: FORMAT_VERSION,
        classes: vec!["High".to_string(), "Low".to_string(), "Medium".to_string()],
        numeric,
        categorical,
        coefficients: vec![high, low, medium],
        intercepts: vec![0.1, -0.2, 0.05],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_missing_file_is_artifact_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("engagement_model.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArtifactMissing);
    }

    #[test]
    fn load_garbage_is_artifact_missing() {
        let file = write_temp("not json at all");
        let err = load(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArtifactMissing);
    }

    #[test]
    fn load_rejects_other_format_versions() {
        let mut artifact = sample_artifact();
        artifact.format_version = 2;
        let file = write_temp(&serde_json::to_string(&artifact).unwrap());
        let err = load(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArtifactMissing);
        assert!(err.to_string().contains("format version 2"));
    }

    #[test]
    fn load_accepts_sample_artifact() {
        let file = write_temp(&serde_json::to_string_pretty(&sample_artifact()).unwrap());
        let pipeline = load(file.path()).unwrap();
        assert_eq!(pipeline.classes(), ["High", "Low", "Medium"]);
        assert_eq!(pipeline.encoded_width(), 21);
    }

    #[test]
    fn shipped_artifact_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_ARTIFACT_PATH);
        let pipeline = load(&path).unwrap();
        assert_eq!(pipeline.classes().len(), 3);
    }
}
