//! Per-render state shared by the TUI and the one-shot CLI.
//!
//! ```text
//! AwaitingInput --predict ok--> ResultDisplayed
//! AwaitingInput --predict err-> Failed
//! any state     --edit field--> AwaitingInput
//! ```
//!
//! A displayed result belongs to the inputs it was computed from; editing a
//! field discards it.

use crate::domain::InputRecord;
use crate::error::AppError;
use crate::inference;
use crate::input::{Field, InputForm};
use crate::locale::Strings;
use crate::models::Classifier;
use crate::report::{self, RenderedResult};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    AwaitingInput,
    ResultDisplayed(RenderedResult),
    Failed(String),
}

/// One user's form plus the borrowed, read-only pipeline.
pub struct Session<'p, C: Classifier + ?Sized> {
    pipeline: &'p C,
    strings: &'static Strings,
    form: InputForm,
    state: ViewState,
}

impl<'p, C: Classifier + ?Sized> Session<'p, C> {
    pub fn new(pipeline: &'p C, strings: &'static Strings) -> Self {
        Self::with_form(pipeline, strings, InputForm::default())
    }

    pub fn with_form(pipeline: &'p C, strings: &'static Strings, form: InputForm) -> Self {
        Self {
            pipeline,
            strings,
            form,
            state: ViewState::AwaitingInput,
        }
    }

    pub fn form(&self) -> &InputForm {
        &self.form
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn strings(&self) -> &'static Strings {
        self.strings
    }

    /// The record the next prediction would use.
    pub fn record(&self) -> InputRecord {
        self.form.collect()
    }

    pub fn adjust(&mut self, field: Field, delta: i32) {
        let before = self.form;
        self.form.adjust(field, delta);
        if self.form != before {
            self.state = ViewState::AwaitingInput;
        }
    }

    /// Predict from the current form. Errors end up in `Failed` and are also returned.
    pub fn predict_now(&mut self) -> Result<RenderedResult, AppError> {
        match self.run_prediction() {
            Ok(rendered) => {
                self.state = ViewState::ResultDisplayed(rendered.clone());
                Ok(rendered)
            }
            Err(err) => {
                tracing::warn!(error = %err, "prediction failed");
                self.state = ViewState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    fn run_prediction(&self) -> Result<RenderedResult, AppError> {
        let result = inference::predict(self.pipeline, self.form.collect())?;
        report::render(&result, self.strings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::tests::StubPipeline;
    use crate::locale::Locale;
    use crate::report::Treatment;

    fn stub() -> StubPipeline {
        StubPipeline::new("Medium", &[("Low", 0.2), ("Medium", 0.6), ("High", 0.2)])
    }

    #[test]
    fn starts_awaiting_input_and_never_predicts_on_its_own() {
        let pipeline = stub();
        let mut session = Session::new(&pipeline, Locale::En.strings());
        assert_eq!(session.state(), &ViewState::AwaitingInput);
        session.adjust(Field::Age, 3);
        assert_eq!(session.state(), &ViewState::AwaitingInput);
        assert_eq!(pipeline.calls.get(), 0);
    }

    #[test]
    fn predict_moves_to_result_displayed() {
        let pipeline = stub();
        let mut session = Session::new(&pipeline, Locale::En.strings());
        let treatment = session.predict_now().unwrap().treatment;
        assert_eq!(treatment, Treatment::Warning);
        assert!(matches!(session.state(), ViewState::ResultDisplayed(_)));
        assert_eq!(pipeline.calls.get(), 1);
    }

    #[test]
    fn editing_discards_the_result() {
        let pipeline = stub();
        let mut session = Session::new(&pipeline, Locale::En.strings());
        session.predict_now().unwrap();
        session.adjust(Field::Gender, 1);
        assert_eq!(session.state(), &ViewState::AwaitingInput);
    }

    #[test]
    fn adjusting_against_a_bound_keeps_the_result() {
        let pipeline = stub();
        let mut form = InputForm::default();
        form.adjust(Field::Age, 100);
        let mut session = Session::with_form(&pipeline, Locale::En.strings(), form);
        session.predict_now().unwrap();
        session.adjust(Field::Age, 1);
        assert!(matches!(session.state(), ViewState::ResultDisplayed(_)));
    }

    #[test]
    fn failure_is_shown_and_can_be_retriggered() {
        let pipeline = StubPipeline::new("Very High", &[("Low", 0.5), ("Very High", 0.5)]);
        let mut session = Session::new(&pipeline, Locale::En.strings());
        assert!(session.predict_now().is_err());
        assert!(matches!(session.state(), ViewState::Failed(msg) if msg.contains("Very High")));
        assert!(session.predict_now().is_err());
        assert_eq!(pipeline.calls.get(), 2);
    }
}
