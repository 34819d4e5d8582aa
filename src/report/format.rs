//! Plain-text and JSON output for `engage predict`.
//!
//! Formatting lives here so the inference code stays free of presentation
//! details and output changes stay localized.

use serde::Serialize;

use crate::domain::InputRecord;
use crate::error::{AppError, ErrorKind};
use crate::input::{Field, InputForm};
use crate::locale::Strings;
use crate::report::{RenderedResult, Treatment};

/// Echo the record as a two-column table.
pub fn format_input_record(record: &InputRecord, strings: &Strings) -> String {
    let form = InputForm {
        age: record.age(),
        gender: record.gender(),
        marital_status: record.marital_status(),
        occupation: record.occupation(),
        monthly_income: record.monthly_income(),
        education: record.education(),
        family_size: record.family_size(),
    };

    let mut rows: Vec<(&str, String)> = Field::ALL
        .iter()
        .map(|&f| (f.label(strings), form.value_label(f)))
        .collect();
    rows.push((strings.field_location, InputForm::location_label()));

    let width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    out.push_str(strings.input_heading);
    out.push('\n');
    for (label, value) in rows {
        out.push_str(&format!("  {label:<width$}  {value}\n"));
    }
    out
}

/// Styled headline plus the probability table (one column per class).
pub fn format_prediction(rendered: &RenderedResult, strings: &Strings) -> String {
    let mut out = String::new();

    out.push_str(strings.result_heading);
    out.push('\n');
    out.push_str(&format!("  [{}] {}\n", treatment_tag(rendered.treatment), rendered.headline));
    out.push('\n');

    out.push_str(strings.probabilities_heading);
    out.push('\n');

    let label_width = strings.probability_row.chars().count();
    let mut header = format!("  {:<label_width$}", "");
    let mut rule = format!("  {:-<label_width$}", "");
    let mut values = format!("  {:<label_width$}", strings.probability_row);
    for row in &rendered.rows {
        let w = row.class.len().max(8);
        header.push_str(&format!(" {:>w$}", row.class));
        rule.push_str(&format!(" {:->w$}", ""));
        values.push_str(&format!(" {:>w$.4}", row.probability));
    }
    out.push_str(header.trim_end());
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&values);
    out.push('\n');

    out
}

fn treatment_tag(treatment: Treatment) -> &'static str {
    match treatment {
        Treatment::Success => "SUCCESS",
        Treatment::Warning => "WARNING",
        Treatment::Alert => "ALERT",
    }
}

#[derive(Serialize)]
struct PredictionReport<'a> {
    input: &'a InputRecord,
    #[serde(flatten)]
    result: &'a RenderedResult,
}

/// JSON document with the echoed input and the rendered result.
pub fn prediction_json(record: &InputRecord, rendered: &RenderedResult) -> Result<String, AppError> {
    let report = PredictionReport { input: record, result: rendered };
    serde_json::to_string_pretty(&report)
        .map_err(|e| AppError::new(ErrorKind::Usage, format!("Failed to serialize prediction: {e}")))
}
