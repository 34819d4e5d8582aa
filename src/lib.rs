//! `engage` library crate.
//!
//! The binary (`engage`) is a thin wrapper around this library so that:
//!
//! - the predict flow is testable without a terminal
//! - the pipeline contract (`models::Classifier`) can be driven by stubs
//! - front-ends (TUI, one-shot CLI) share one session state machine

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod inference;
pub mod input;
pub mod locale;
pub mod logging;
pub mod models;
pub mod report;
pub mod tui;
