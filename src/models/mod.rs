//! The fitted engagement pipeline: artifact schema, loading, and evaluation.
//!
//! The rest of the crate only talks to a pipeline through [`Classifier`], so the
//! inference flow can be driven by the real artifact or by a stub in tests.

pub mod artifact;
pub mod pipeline;

pub use artifact::*;
pub use pipeline::*;

use crate::domain::InputRecord;
use crate::error::AppError;

/// The two-operation contract of a fitted pipeline.
pub trait Classifier {
    /// Known class labels, in the order `class_probabilities` reports them.
    fn classes(&self) -> &[String];

    /// Predicted class label for `record`.
    fn classify(&self, record: &InputRecord) -> Result<String, AppError>;

    /// One probability per entry of `classes()`.
    fn class_probabilities(&self, record: &InputRecord) -> Result<Vec<f64>, AppError>;
}
