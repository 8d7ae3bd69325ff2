//! Record Validator for Vocabulary and Header Checks

use crate::error::ValidationError;
use crate::frame::HeaderIndex;
use crate::record::CensusRecord;
use crate::schema::{CensusSchema, CENSUS_SCHEMA};
use csv::StringRecord;

/// Result of validation
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            fields_checked,
        }
    }

    /// `Ok` with the number of checked fields, or every collected error
    pub fn into_result(self) -> Result<usize, Vec<ValidationError>> {
        if self.valid {
            Ok(self.fields_checked)
        } else {
            Err(self.errors)
        }
    }
}

/// Validates records and headers against a census schema
pub struct Validator {
    schema: CensusSchema,
}

impl Validator {
    /// Create a new validator for the given schema
    pub fn new(schema: CensusSchema) -> Self {
        Self { schema }
    }

    /// Schema this validator checks against
    pub fn schema(&self) -> &CensusSchema {
        &self.schema
    }

    /// Check a single categorical value against its vocabulary
    pub fn validate_category(&self, column: usize, value: &str) -> Result<usize, ValidationError> {
        let spec = &self.schema.categorical[column];
        spec.position(value)
            .ok_or_else(|| ValidationError::UnknownCategory {
                column: spec.name,
                value: value.to_string(),
            })
    }

    /// Check every present categorical value of a record
    pub fn validate_record(&self, record: &CensusRecord) -> ValidationResult {
        let errors: Vec<ValidationError> = record
            .categorical
            .iter()
            .enumerate()
            .filter_map(|(column, value)| {
                value
                    .as_deref()
                    .and_then(|v| self.validate_category(column, v).err())
            })
            .collect();

        let fields_checked = record.numeric.len() + record.categorical.len();
        if errors.is_empty() {
            ValidationResult::valid(fields_checked)
        } else {
            ValidationResult::invalid(errors, fields_checked)
        }
    }

    /// Check that a header row carries every required column
    pub fn validate_header(&self, headers: &StringRecord) -> Result<(), ValidationError> {
        HeaderIndex::resolve(&self.schema, headers).map(|_| ())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(CENSUS_SCHEMA)
    }
}
