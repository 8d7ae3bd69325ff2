//! Census Records and Income Classes

use crate::error::ValidationError;
use crate::schema::{CATEGORICAL_COUNT, MISSING_SENTINEL, NUMERIC_COUNT};
use serde::{Deserialize, Serialize};

/// One row of input features, with missing values as `None`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CensusRecord {
    /// Numeric attributes in schema order
    pub numeric: [Option<f64>; NUMERIC_COUNT],
    /// Categorical attributes in schema order
    pub categorical: [Option<String>; CATEGORICAL_COUNT],
}

/// Binary income class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeClass {
    /// `<=50K`, encoded as 0
    #[serde(rename = "at_most_50k")]
    AtMost50K,
    /// `>50K`, encoded as 1
    #[serde(rename = "above_50k")]
    Above50K,
}

impl IncomeClass {
    /// Parse a source label; the UCI test file appends a trailing period
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().trim_end_matches('.') {
            "<=50K" => Some(IncomeClass::AtMost50K),
            ">50K" => Some(IncomeClass::Above50K),
            _ => None,
        }
    }

    /// Class from a model output
    pub fn from_code(code: f64) -> Self {
        if code >= 0.5 {
            IncomeClass::Above50K
        } else {
            IncomeClass::AtMost50K
        }
    }

    /// Numeric class code
    pub fn code(&self) -> u8 {
        match self {
            IncomeClass::AtMost50K => 0,
            IncomeClass::Above50K => 1,
        }
    }

    /// Source label text
    pub fn label(&self) -> &'static str {
        match self {
            IncomeClass::AtMost50K => "<=50K",
            IncomeClass::Above50K => ">50K",
        }
    }

    /// Human-readable prediction text
    pub fn message(&self) -> &'static str {
        match self {
            IncomeClass::AtMost50K => "salary not more than 50000",
            IncomeClass::Above50K => "salary more than 50000",
        }
    }
}

/// Normalize a raw cell: trimmed, with the sentinel and blanks as `None`
pub fn normalize_cell(raw: &str) -> Option<&str> {
    let value = raw.trim();
    if value.is_empty() || value == MISSING_SENTINEL {
        None
    } else {
        Some(value)
    }
}

/// Parse a numeric cell
pub fn parse_numeric(
    row: usize,
    column: &'static str,
    raw: &str,
) -> Result<Option<f64>, ValidationError> {
    match normalize_cell(raw) {
        None => Ok(None),
        Some(value) => match value.parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(Some(number)),
            _ => Err(ValidationError::InvalidNumber {
                row,
                column,
                value: value.to_string(),
            }),
        },
    }
}

/// A single record submitted for prediction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub age: Option<f64>,
    pub fnlwgt: Option<f64>,
    pub education_num: Option<f64>,
    pub capital_gain: Option<f64>,
    pub capital_loss: Option<f64>,
    pub hours_per_week: Option<f64>,
    pub workclass: Option<String>,
    pub marital_status: Option<String>,
    pub occupation: Option<String>,
    pub relationship: Option<String>,
    pub race: Option<String>,
    pub sex: Option<String>,
    pub native_country: Option<String>,
}

impl PredictionRequest {
    /// Convert into a schema-ordered record, applying the same cell
    /// normalization as the training data
    pub fn to_record(&self) -> CensusRecord {
        let text = |value: &Option<String>| {
            value
                .as_deref()
                .and_then(normalize_cell)
                .map(str::to_string)
        };
        let number = |value: Option<f64>| value.filter(|v| v.is_finite());

        CensusRecord {
            numeric: [
                number(self.age),
                number(self.fnlwgt),
                number(self.education_num),
                number(self.capital_gain),
                number(self.capital_loss),
                number(self.hours_per_week),
            ],
            categorical: [
                text(&self.workclass),
                text(&self.marital_status),
                text(&self.occupation),
                text(&self.relationship),
                text(&self.race),
                text(&self.sex),
                text(&self.native_country),
            ],
        }
    }
}
