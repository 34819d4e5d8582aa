//! Domain types used throughout the prediction flow.
//!
//! This module defines:
//!
//! - the form field domains (`Gender`, `MonthlyIncome`, `Age`, ...)
//! - the request record handed to the pipeline (`InputRecord`)
//! - the prediction output (`EngagementLevel`, `PredictionResult`)

pub mod types;

pub use types::*;
