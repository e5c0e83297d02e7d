//! Diagnosis requests and the text form they are built from.

use serde::{Deserialize, Serialize};

use crate::obs;

/// A structured vehicle + symptom description.
///
/// This is the JSON body of `POST /api/diagnose`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnosisRequest {
    pub car_make: String,
    pub car_model: String,

    /// Model year. `None` when the form input was not a number; serialized
    /// as `null`.
    #[serde(default)]
    pub car_year: Option<i64>,

    /// Odometer reading in miles. Zero when the form input was not a number.
    #[serde(default)]
    pub mileage: i64,

    /// Free-text symptom description.
    pub symptoms: String,
}

impl DiagnosisRequest {
    pub fn new(
        car_make: impl Into<String>,
        car_model: impl Into<String>,
        car_year: Option<i64>,
        mileage: i64,
        symptoms: impl Into<String>,
    ) -> Self {
        Self {
            car_make: car_make.into(),
            car_model: car_model.into(),
            car_year,
            mileage,
            symptoms: symptoms.into(),
        }
    }

    /// One-paragraph summary of the vehicle and its symptoms, in the form
    /// handed to a diagnostic agent.
    pub fn prompt(&self) -> String {
        let year = self
            .car_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        format!(
            "Car: {} {} {} ({} miles). \nSymptoms: {}",
            year, self.car_make, self.car_model, self.mileage, self.symptoms
        )
    }
}

/// Raw text fields as typed into the diagnosis form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormInput {
    pub make: String,
    pub model: String,
    pub year: String,
    pub mileage: String,
    pub symptoms: String,
}

impl FormInput {
    /// Build a request from the form.
    ///
    /// Numeric fields never fail: an unparseable year becomes `None` and an
    /// unparseable (or zero) mileage becomes `0`. Each coercion is logged.
    pub fn into_request(self) -> DiagnosisRequest {
        let car_year = parse_leading_int(&self.year);
        if car_year.is_none() {
            obs::emit_input_coerced("car_year", &self.year, "null");
        }

        let mileage = match parse_leading_int(&self.mileage) {
            Some(m) => m,
            None => {
                obs::emit_input_coerced("mileage", &self.mileage, "0");
                0
            }
        };

        DiagnosisRequest {
            car_make: self.make,
            car_model: self.model,
            car_year,
            mileage,
            symptoms: self.symptoms,
        }
    }
}

/// Parse the leading base-10 integer of `input`.
///
/// Leading whitespace and a single sign are accepted; parsing stops at the
/// first non-digit, so `"2015 model"` gives `2015` and `"12.9"` gives `12`.
/// Returns `None` when no digit leads the text or the value overflows `i64`.
///
/// Unlike a browser `parseInt`, a `0x` prefix is not read as hex (`"0x1A"`
/// gives `0`), and out-of-range values give `None` rather than a rounded
/// float.
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for b in digits[..end].bytes() {
        let digit = i64::from(b - b'0');
        value = value.checked_mul(10)?;
        value = if negative {
            value.checked_sub(digit)?
        } else {
            value.checked_add(digit)?
        };
    }
    Some(value)
}
