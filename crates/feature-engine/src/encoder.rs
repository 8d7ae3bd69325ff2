//! Ordinal Encoding Against Fixed Vocabularies

use crate::TransformError;
use census_schema::{CensusSchema, ValidationError, Validator};
use serde::{Deserialize, Serialize};

/// Maps categorical values to their position in the fixed vocabulary.
///
/// Codes come from the compiled schema; the vocabulary snapshot taken at
/// fit time lets a reloaded encoder detect that the schema has changed
/// since the artifact was written.
#[derive(Serialize, Deserialize)]
pub struct OrdinalEncoder {
    #[serde(skip)]
    validator: Validator,
    vocabularies: Vec<Vec<String>>,
}

impl OrdinalEncoder {
    /// Create an encoder for the schema's categorical columns
    pub fn new(schema: CensusSchema) -> Self {
        let vocabularies = schema
            .categorical
            .iter()
            .map(|c| c.vocabulary.iter().map(|v| v.to_string()).collect())
            .collect();
        Self {
            validator: Validator::new(schema),
            vocabularies,
        }
    }

    /// Ordinal code of `value` in categorical column `column`
    pub fn encode(&self, column: usize, value: &str) -> Result<f64, ValidationError> {
        self.validator
            .validate_category(column, value)
            .map(|position| position as f64)
    }

    /// Confirm the snapshot still matches the compiled vocabularies
    pub fn verify(&self) -> Result<(), TransformError> {
        let schema = self.validator.schema();
        if self.vocabularies.len() != schema.categorical.len() {
            return Err(TransformError::VocabularyMismatch("column count"));
        }
        for (snapshot, column) in self.vocabularies.iter().zip(schema.categorical.iter()) {
            let same = snapshot.len() == column.vocabulary.len()
                && snapshot.iter().zip(column.vocabulary).all(|(a, b)| a == b);
            if !same {
                return Err(TransformError::VocabularyMismatch(column.name));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for OrdinalEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdinalEncoder")
            .field("columns", &self.vocabularies.len())
            .finish()
    }
}
