//! Result rendering: styling treatment per level and the probability table.
//!
//! Both front-ends (TUI and `engage predict`) go through [`render`], so the
//! choice of treatment lives in exactly one table.

use serde::Serialize;

use crate::domain::{EngagementLevel, PredictionResult};
use crate::error::AppError;
use crate::locale::Strings;

pub mod format;

pub use format::*;

/// How a predicted level is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Treatment {
    /// Celebratory.
    Success,
    /// Cautionary.
    Warning,
    /// Alert.
    Alert,
}

impl Treatment {
    pub fn emoji(self) -> &'static str {
        match self {
            Treatment::Success => "🎉",
            Treatment::Warning => "😐",
            Treatment::Alert => "😟",
        }
    }

    pub fn celebrates(self) -> bool {
        self == Treatment::Success
    }
}

/// Level → treatment. Adding a class is one more row here.
pub const TREATMENTS: [(EngagementLevel, Treatment); 3] = [
    (EngagementLevel::High, Treatment::Success),
    (EngagementLevel::Medium, Treatment::Warning),
    (EngagementLevel::Low, Treatment::Alert),
];

pub fn treatment_for(level: EngagementLevel) -> Option<Treatment> {
    TREATMENTS
        .iter()
        .find(|(l, _)| *l == level)
        .map(|(_, t)| *t)
}

/// One row of the probability table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityRow {
    pub class: &'static str,
    pub probability: f64,
}

/// Everything needed to display a prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedResult {
    pub level: EngagementLevel,
    pub treatment: Treatment,
    pub headline: String,
    pub rows: Vec<ProbabilityRow>,
}

pub fn render(result: &PredictionResult, strings: &Strings) -> Result<RenderedResult, AppError> {
    let treatment = treatment_for(result.level).ok_or_else(|| {
        AppError::inference(format!("No presentation for engagement level '{}'.", result.level.label()))
    })?;

    let headline = format!(
        "{}: {} {}",
        strings.engagement_level,
        result.level.label(),
        treatment.emoji()
    );

    let rows = result
        .probabilities
        .iter()
        .map(|p| ProbabilityRow {
            class: p.level.label(),
            probability: p.probability,
        })
        .collect();

    Ok(RenderedResult {
        level: result.level,
        treatment,
        headline,
        rows,
    })
}
