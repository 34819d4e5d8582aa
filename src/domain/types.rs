//! Shared domain types.
//!
//! Every field of an [`InputRecord`] is a closed enum or a bounded newtype, so a
//! record that exists is always complete and in-domain. Category labels are the
//! exact strings the pipeline was fitted with.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Column names as they appear in the pipeline's feature schema.
pub mod columns {
    pub const AGE: &str = "Age";
    pub const GENDER: &str = "Gender";
    pub const MARITAL_STATUS: &str = "Marital Status";
    pub const OCCUPATION: &str = "Occupation";
    pub const MONTHLY_INCOME: &str = "Monthly Income";
    pub const EDUCATION: &str = "Educational Qualifications";
    pub const FAMILY_SIZE: &str = "Family size";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const PIN_CODE: &str = "Pin code";

    pub const ALL: [&str; 10] = [
        AGE,
        GENDER,
        MARITAL_STATUS,
        OCCUPATION,
        MONTHLY_INCOME,
        EDUCATION,
        FAMILY_SIZE,
        LATITUDE,
        LONGITUDE,
        PIN_CODE,
    ];
}

/// A closed set of options shown as a select box.
///
/// `next`/`prev` cycle through `ALL` in declaration order.
pub trait Choice: Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn position(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let n = Self::ALL.len();
        Self::ALL[(self.position() + n - 1) % n]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum Gender {
    #[default]
    Female,
    Male,
}

impl Choice for Gender {
    const ALL: &'static [Self] = &[Gender::Female, Gender::Male];

    fn label(self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
    #[serde(rename = "Prefer not to say")]
    PreferNotToSay,
}

impl Choice for MaritalStatus {
    const ALL: &'static [Self] = &[
        MaritalStatus::Single,
        MaritalStatus::Married,
        MaritalStatus::PreferNotToSay,
    ];

    fn label(self) -> &'static str {
        match self {
            MaritalStatus::Single => "Single",
            MaritalStatus::Married => "Married",
            MaritalStatus::PreferNotToSay => "Prefer not to say",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum Occupation {
    #[default]
    Student,
    Employee,
    /// Spelled "Self Employeed" in the training data.
    #[serde(rename = "Self Employeed")]
    SelfEmployed,
    #[serde(rename = "House wife")]
    HouseWife,
}

impl Choice for Occupation {
    const ALL: &'static [Self] = &[
        Occupation::Student,
        Occupation::Employee,
        Occupation::SelfEmployed,
        Occupation::HouseWife,
    ];

    fn label(self) -> &'static str {
        match self {
            Occupation::Student => "Student",
            Occupation::Employee => "Employee",
            Occupation::SelfEmployed => "Self Employeed",
            Occupation::HouseWife => "House wife",
        }
    }
}

/// Monthly income bracket, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, ValueEnum)]
pub enum MonthlyIncome {
    #[default]
    #[serde(rename = "No Income")]
    NoIncome,
    #[serde(rename = "Below Rs.10000")]
    #[value(name = "below-10000")]
    Below10000,
    #[serde(rename = "10001 to 25000")]
    #[value(name = "10001-25000")]
    From10001To25000,
    #[serde(rename = "25001 to 50000")]
    #[value(name = "25001-50000")]
    From25001To50000,
    #[serde(rename = "More than 50000")]
    #[value(name = "above-50000")]
    MoreThan50000,
}

impl Choice for MonthlyIncome {
    const ALL: &'static [Self] = &[
        MonthlyIncome::NoIncome,
        MonthlyIncome::Below10000,
        MonthlyIncome::From10001To25000,
        MonthlyIncome::From25001To50000,
        MonthlyIncome::MoreThan50000,
    ];

    fn label(self) -> &'static str {
        match self {
            MonthlyIncome::NoIncome => "No Income",
            MonthlyIncome::Below10000 => "Below Rs.10000",
            MonthlyIncome::From10001To25000 => "10001 to 25000",
            MonthlyIncome::From25001To50000 => "25001 to 50000",
            MonthlyIncome::MoreThan50000 => "More than 50000",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum Education {
    #[default]
    Graduate,
    #[serde(rename = "Post Graduate")]
    PostGraduate,
    #[serde(rename = "Ph.D")]
    #[value(name = "phd")]
    PhD,
    School,
    Uneducated,
}

impl Choice for Education {
    const ALL: &'static [Self] = &[
        Education::Graduate,
        Education::PostGraduate,
        Education::PhD,
        Education::School,
        Education::Uneducated,
    ];

    fn label(self) -> &'static str {
        match self {
            Education::Graduate => "Graduate",
            Education::PostGraduate => "Post Graduate",
            Education::PhD => "Ph.D",
            Education::School => "School",
            Education::Uneducated => "Uneducated",
        }
    }
}

/// Customer age in years, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Age(u8);

impl Age {
    pub const MIN: u8 = 18;
    pub const MAX: u8 = 70;
    pub const DEFAULT: u8 = 25;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Move by `delta`, clamping at the bounds.
    pub fn step(self, delta: i32) -> Self {
        Self(clamp_step(self.0, delta, Self::MIN, Self::MAX))
    }
}

impl Default for Age {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Household size, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FamilySize(u8);

impl FamilySize {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const DEFAULT: u8 = 3;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn step(self, delta: i32) -> Self {
        Self(clamp_step(self.0, delta, Self::MIN, Self::MAX))
    }
}

impl Default for FamilySize {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

fn clamp_step(value: u8, delta: i32, min: u8, max: u8) -> u8 {
    (i32::from(value) + delta).clamp(i32::from(min), i32::from(max)) as u8
}

/// Location fields the pipeline expects but the form does not expose.
///
/// Every record is placed in central Bengaluru. This is a known simplification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    #[serde(rename = "Pin code")]
    pub pin_code: u32,
    pub latitude: f64,
    pub longitude: f64,
}

pub const DEFAULT_LOCATION: Location = Location {
    pin_code: 560001,
    latitude: 12.9716,
    longitude: 77.5946,
};

/// A feature value as seen by the pipeline's preprocessing step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Numeric(f64),
    Category(&'static str),
}

/// One complete, immutable request to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputRecord {
    #[serde(rename = "Age")]
    age: Age,
    #[serde(rename = "Gender")]
    gender: Gender,
    #[serde(rename = "Marital Status")]
    marital_status: MaritalStatus,
    #[serde(rename = "Occupation")]
    occupation: Occupation,
    #[serde(rename = "Monthly Income")]
    monthly_income: MonthlyIncome,
    #[serde(rename = "Educational Qualifications")]
    education: Education,
    #[serde(rename = "Family size")]
    family_size: FamilySize,
    #[serde(flatten)]
    location: Location,
}

impl InputRecord {
    pub fn new(
        age: Age,
        gender: Gender,
        marital_status: MaritalStatus,
        occupation: Occupation,
        monthly_income: MonthlyIncome,
        education: Education,
        family_size: FamilySize,
    ) -> Self {
        Self {
            age,
            gender,
            marital_status,
            occupation,
            monthly_income,
            education,
            family_size,
            location: DEFAULT_LOCATION,
        }
    }

    pub fn age(&self) -> Age {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn marital_status(&self) -> MaritalStatus {
        self.marital_status
    }

    pub fn occupation(&self) -> Occupation {
        self.occupation
    }

    pub fn monthly_income(&self) -> MonthlyIncome {
        self.monthly_income
    }

    pub fn education(&self) -> Education {
        self.education
    }

    pub fn family_size(&self) -> FamilySize {
        self.family_size
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Look up a column by its schema name.
    pub fn feature(&self, name: &str) -> Option<FeatureValue> {
        let value = match name {
            columns::AGE => FeatureValue::Numeric(f64::from(self.age.get())),
            columns::GENDER => FeatureValue::Category(self.gender.label()),
            columns::MARITAL_STATUS => FeatureValue::Category(self.marital_status.label()),
            columns::OCCUPATION => FeatureValue::Category(self.occupation.label()),
            columns::MONTHLY_INCOME => FeatureValue::Category(self.monthly_income.label()),
            columns::EDUCATION => FeatureValue::Category(self.education.label()),
            columns::FAMILY_SIZE => FeatureValue::Numeric(f64::from(self.family_size.get())),
            columns::LATITUDE => FeatureValue::Numeric(self.location.latitude),
            columns::LONGITUDE => FeatureValue::Numeric(self.location.longitude),
            columns::PIN_CODE => FeatureValue::Numeric(f64::from(self.location.pin_code)),
            _ => return None,
        };
        Some(value)
    }
}

/// Ordinal engagement target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EngagementLevel {
    Low,
    Medium,
    High,
}

impl EngagementLevel {
    pub const ALL: [EngagementLevel; 3] = [EngagementLevel::Low, EngagementLevel::Medium, EngagementLevel::High];

    pub fn label(self) -> &'static str {
        match self {
            EngagementLevel::Low => "Low",
            EngagementLevel::Medium => "Medium",
            EngagementLevel::High => "High",
        }
    }

    /// Parse a class label. Anything outside {Low, Medium, High} is `None`.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassProbability {
    pub level: EngagementLevel,
    pub probability: f64,
}

/// Output of one prediction: the winning level and the full distribution,
/// in the pipeline's class order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub level: EngagementLevel,
    pub probabilities: Vec<ClassProbability>,
}

impl PredictionResult {
    pub fn probability_of(&self, level: EngagementLevel) -> Option<f64> {
        self.probabilities
            .iter()
            .find(|p| p.level == level)
            .map(|p| p.probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_fields_reject_out_of_range() {
        assert!(Age::new(17).is_none());
        assert!(Age::new(71).is_none());
        assert_eq!(Age::new(18).map(Age::get), Some(18));
        assert!(FamilySize::new(0).is_none());
        assert!(FamilySize::new(11).is_none());
    }

    #[test]
    fn step_clamps_at_bounds() {
        assert_eq!(Age::default().step(-100).get(), Age::MIN);
        assert_eq!(Age::default().step(100).get(), Age::MAX);
        assert_eq!(FamilySize::default().step(1).get(), 4);
    }

    #[test]
    fn choices_cycle_in_both_directions() {
        assert_eq!(Gender::Male.next(), Gender::Female);
        assert_eq!(Gender::Female.prev(), Gender::Male);
        assert_eq!(MonthlyIncome::MoreThan50000.next(), MonthlyIncome::NoIncome);
        assert_eq!(Education::Graduate.prev(), Education::Uneducated);
    }

    #[test]
    fn every_column_resolves_on_a_record() {
        let record = InputRecord::new(
            Age::default(),
            Gender::default(),
            MaritalStatus::default(),
            Occupation::default(),
            MonthlyIncome::default(),
            Education::default(),
            FamilySize::default(),
        );
        for name in columns::ALL {
            assert!(record.feature(name).is_some(), "missing column {name}");
        }
        assert_eq!(record.feature("Shoe size"), None);
        assert_eq!(record.feature(columns::PIN_CODE), Some(FeatureValue::Numeric(560001.0)));
        assert_eq!(record.feature(columns::OCCUPATION), Some(FeatureValue::Category("Student")));
    }

    #[test]
    fn record_serializes_with_schema_names() {
        let record = InputRecord::new(
            Age::default(),
            Gender::Male,
            MaritalStatus::PreferNotToSay,
            Occupation::SelfEmployed,
            MonthlyIncome::Below10000,
            Education::PhD,
            FamilySize::default(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Age"], 25);
        assert_eq!(json["Marital Status"], "Prefer not to say");
        assert_eq!(json["Occupation"], "Self Employeed");
        assert_eq!(json["Monthly Income"], "Below Rs.10000");
        assert_eq!(json["Educational Qualifications"], "Ph.D");
        assert_eq!(json["Pin code"], 560001);
    }

    #[test]
    fn unknown_level_does_not_parse() {
        assert_eq!(EngagementLevel::parse("Medium"), Some(EngagementLevel::Medium));
        assert_eq!(EngagementLevel::parse("medium"), None);
        assert_eq!(EngagementLevel::parse("Very High"), None);
    }
}
