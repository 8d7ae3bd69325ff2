//! Census Schema and Record Validation
//!
//! Column layout, fixed categorical vocabularies, CSV record parsing, and
//! validation for the census income dataset.

mod error;
mod frame;
mod record;
mod schema;
mod validator;

pub use error::ValidationError;
pub use frame::{HeaderIndex, LabelledFrame};
pub use record::{normalize_cell, parse_numeric, CensusRecord, IncomeClass, PredictionRequest};
pub use schema::{
    CategoricalColumn, CensusSchema, CATEGORICAL_COUNT, CENSUS_SCHEMA, DROPPED_COLUMNS,
    FEATURE_COUNT, LABEL_COLUMN, MISSING_SENTINEL, NUMERIC_COLUMNS, NUMERIC_COUNT,
};
pub use validator::{ValidationResult, Validator};
