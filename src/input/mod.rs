//! Form state for collecting one [`InputRecord`].
//!
//! Every field starts at a default and can only move within its domain
//! (sliders clamp, select boxes cycle), so `collect` always succeeds.

use crate::domain::{
    Age, Choice, DEFAULT_LOCATION, Education, FamilySize, Gender, InputRecord, MaritalStatus, MonthlyIncome,
    Occupation,
};
use crate::locale::Strings;

/// The editable form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Age,
    Gender,
    MaritalStatus,
    Occupation,
    MonthlyIncome,
    Education,
    FamilySize,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Age,
        Field::Gender,
        Field::MaritalStatus,
        Field::Occupation,
        Field::MonthlyIncome,
        Field::Education,
        Field::FamilySize,
    ];

    pub fn label(self, strings: &Strings) -> &'static str {
        match self {
            Field::Age => strings.field_age,
            Field::Gender => strings.field_gender,
            Field::MaritalStatus => strings.field_marital_status,
            Field::Occupation => strings.field_occupation,
            Field::MonthlyIncome => strings.field_monthly_income,
            Field::Education => strings.field_education,
            Field::FamilySize => strings.field_family_size,
        }
    }

    /// Whether the field is a slider (as opposed to a select box).
    pub fn is_slider(self) -> bool {
        matches!(self, Field::Age | Field::FamilySize)
    }
}

/// Current value of every form control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputForm {
    pub age: Age,
    pub gender: Gender,
    pub marital_status: MaritalStatus,
    pub occupation: Occupation,
    pub monthly_income: MonthlyIncome,
    pub education: Education,
    pub family_size: FamilySize,
}

impl InputForm {
    /// Move `field` by `delta` steps within its domain.
    pub fn adjust(&mut self, field: Field, delta: i32) {
        match field {
            Field::Age => self.age = self.age.step(delta),
            Field::FamilySize => self.family_size = self.family_size.step(delta),
            Field::Gender => self.gender = cycle(self.gender, delta),
            Field::MaritalStatus => self.marital_status = cycle(self.marital_status, delta),
            Field::Occupation => self.occupation = cycle(self.occupation, delta),
            Field::MonthlyIncome => self.monthly_income = cycle(self.monthly_income, delta),
            Field::Education => self.education = cycle(self.education, delta),
        }
    }

    /// Display text for the current value of `field`.
    pub fn value_label(&self, field: Field) -> String {
        match field {
            Field::Age => self.age.get().to_string(),
            Field::FamilySize => self.family_size.get().to_string(),
            Field::Gender => self.gender.label().to_string(),
            Field::MaritalStatus => self.marital_status.label().to_string(),
            Field::Occupation => self.occupation.label().to_string(),
            Field::MonthlyIncome => self.monthly_income.label().to_string(),
            Field::Education => self.education.label().to_string(),
        }
    }

    /// Display text for the fixed location fields.
    pub fn location_label() -> String {
        format!(
            "{} ({:.4}, {:.4})",
            DEFAULT_LOCATION.pin_code, DEFAULT_LOCATION.latitude, DEFAULT_LOCATION.longitude
        )
    }

    pub fn collect(&self) -> InputRecord {
        InputRecord::new(
            self.age,
            self.gender,
            self.marital_status,
            self.occupation,
            self.monthly_income,
            self.education,
            self.family_size,
        )
    }
}

fn cycle<C: Choice>(value: C, delta: i32) -> C {
    let mut out = value;
    for _ in 0..delta.unsigned_abs() {
        out = if delta > 0 { out.next() } else { out.prev() };
    }
    out
}
