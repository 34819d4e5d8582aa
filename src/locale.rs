//! Display strings for each supported UI language.
//!
//! The flow is identical in every language; only the text differs. Category
//! values (e.g. "Self Employeed") are data, not UI text, and are never
//! translated because the pipeline matches on them.

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Bahasa Indonesia.
    Id,
}

impl Locale {
    pub fn strings(self) -> &'static Strings {
        match self {
            Locale::En => &EN,
            Locale::Id => &ID,
        }
    }
}

pub struct Strings {
    pub title: &'static str,
    pub intro: &'static str,
    pub form_header: &'static str,
    pub input_heading: &'static str,
    pub result_heading: &'static str,
    pub probabilities_heading: &'static str,
    pub predict_button: &'static str,
    pub engagement_level: &'static str,
    pub probability_row: &'static str,
    pub class_column: &'static str,
    pub awaiting_input: &'static str,
    pub prediction_failed: &'static str,
    pub celebrate: &'static str,
    pub footer_info: &'static str,
    pub key_help: &'static str,

    pub field_age: &'static str,
    pub field_gender: &'static str,
    pub field_marital_status: &'static str,
    pub field_occupation: &'static str,
    pub field_monthly_income: &'static str,
    pub field_education: &'static str,
    pub field_family_size: &'static str,
    pub field_location: &'static str,

    artifact_missing: fn(&str) -> String,
}

impl Strings {
    /// The halt message shown when the pipeline artifact cannot be loaded.
    pub fn artifact_missing(&self, path: &str) -> String {
        (self.artifact_missing)(path)
    }
}

static EN: Strings = Strings {
    title: "🚀 Customer Engagement Prediction",
    intro: "This application predicts the customer engagement level (High, Medium, or Low) \
            based on their demographic and behavioral data. Enter the data in the form to get started.",
    form_header: "Enter Customer Data",
    input_heading: "Customer Data Input:",
    result_heading: "Prediction Result:",
    probabilities_heading: "Prediction Probabilities:",
    predict_button: "Predict Now",
    engagement_level: "Engagement Level",
    probability_row: "Probability",
    class_column: "Class",
    awaiting_input: "Press Enter to predict.",
    prediction_failed: "Prediction failed",
    celebrate: "🎈 🎈 🎈",
    footer_info: "This app was created as part of the MPML final project.",
    key_help: "↑/↓ select  ←/→ adjust  Enter/p predict  q quit",

    field_age: "Age",
    field_gender: "Gender",
    field_marital_status: "Marital Status",
    field_occupation: "Occupation",
    field_monthly_income: "Monthly Income",
    field_education: "Educational Qualifications",
    field_family_size: "Family Size",
    field_location: "Location",

    artifact_missing: artifact_missing_en,
};

static ID: Strings = Strings {
    title: "🚀 Prediksi Keterlibatan Pelanggan",
    intro: "Aplikasi ini memprediksi tingkat keterlibatan pelanggan (High, Medium, atau Low) \
            berdasarkan data demografis dan perilaku mereka. Masukkan data pada formulir untuk memulai.",
    form_header: "Masukkan Data Pelanggan",
    input_heading: "Data Input Pelanggan:",
    result_heading: "Hasil Prediksi:",
    probabilities_heading: "Probabilitas Prediksi:",
    predict_button: "Prediksi Sekarang",
    engagement_level: "Tingkat Keterlibatan",
    probability_row: "Probabilitas",
    class_column: "Kelas",
    awaiting_input: "Tekan Enter untuk memprediksi.",
    prediction_failed: "Prediksi gagal",
    celebrate: "🎈 🎈 🎈",
    footer_info: "Aplikasi ini dibuat sebagai bagian dari proyek akhir MPML.",
    key_help: "↑/↓ pilih  ←/→ ubah  Enter/p prediksi  q keluar",

    field_age: "Usia",
    field_gender: "Jenis Kelamin",
    field_marital_status: "Status Pernikahan",
    field_occupation: "Pekerjaan",
    field_monthly_income: "Pendapatan Bulanan",
    field_education: "Kualifikasi Pendidikan",
    field_family_size: "Jumlah Anggota Keluarga",
    field_location: "Lokasi",

    artifact_missing: artifact_missing_id,
};

fn artifact_missing_en(path: &str) -> String {
    format!("Model file '{path}' not found. Please make sure it is in the same directory.")
}

fn artifact_missing_id(path: &str) -> String {
    format!("File model '{path}' tidak ditemukan. Pastikan file tersebut berada di direktori yang sama.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halt_message_names_the_file() {
        for locale in Locale::value_variants() {
            let msg = locale.strings().artifact_missing("engagement_model.json");
            assert!(msg.contains("'engagement_model.json'"), "{msg}");
        }
    }

    #[test]
    fn locales_differ_only_in_text() {
        assert_ne!(Locale::En.strings().title, Locale::Id.strings().title);
        assert_eq!(Locale::En.strings().celebrate, Locale::Id.strings().celebrate);
    }
}
