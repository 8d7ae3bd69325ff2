//! Fitted Column Transformer
//!
//! Numeric columns: median imputation, then standardization.
//! Categorical columns: most-frequent imputation, ordinal encoding against
//! the fixed vocabulary, then (by default) standardization of the codes.
//! Output columns are the numeric block followed by the categorical block,
//! each in schema order.

use crate::encoder::OrdinalEncoder;
use crate::imputer::{MedianImputer, MostFrequentImputer};
use crate::scaler::StandardScaler;
use crate::TransformError;
use census_schema::{
    CensusRecord, CensusSchema, CATEGORICAL_COUNT, FEATURE_COUNT, NUMERIC_COUNT,
};
use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Configures and fits a [`Transformer`]
#[derive(Debug, Clone, Copy)]
pub struct TransformerBuilder {
    schema: CensusSchema,
    scale_ordinal_codes: bool,
}

impl TransformerBuilder {
    /// Create a builder for the given schema
    pub fn new(schema: CensusSchema) -> Self {
        Self {
            schema,
            scale_ordinal_codes: true,
        }
    }

    /// Whether ordinal codes are standardized like numeric columns
    pub fn scale_ordinal_codes(mut self, enabled: bool) -> Self {
        self.scale_ordinal_codes = enabled;
        self
    }

    /// Learn every statistic from `records`
    pub fn fit(&self, records: &[CensusRecord]) -> Result<Transformer, TransformError> {
        if records.is_empty() {
            return Err(TransformError::EmptyInput);
        }
        info!("Data transformation fit on {} rows", records.len());

        let numeric_columns: Vec<Vec<Option<f64>>> = (0..NUMERIC_COUNT)
            .map(|j| records.iter().map(|r| r.numeric[j]).collect())
            .collect();
        let numeric_imputer = MedianImputer::fit(&numeric_columns, &self.schema.numeric[..])?;
        let numeric = impute_numeric(&numeric_imputer, records);
        let numeric_scaler = StandardScaler::fit(&numeric);

        let categorical_names: Vec<&'static str> =
            self.schema.categorical.iter().map(|c| c.name).collect();
        let categorical_columns: Vec<Vec<Option<&str>>> = (0..CATEGORICAL_COUNT)
            .map(|j| records.iter().map(|r| r.categorical[j].as_deref()).collect())
            .collect();
        let categorical_imputer =
            MostFrequentImputer::fit(&categorical_columns, &categorical_names)?;
        let encoder = OrdinalEncoder::new(self.schema);
        let codes = encode_categorical(&categorical_imputer, &encoder, records)?;
        let categorical_scaler = if self.scale_ordinal_codes {
            StandardScaler::fit(&codes)
        } else {
            StandardScaler::identity(CATEGORICAL_COUNT)
        };

        debug!(
            "Fitted medians {:?}, modes {:?}",
            numeric_imputer.medians(),
            categorical_imputer.modes()
        );

        Ok(Transformer {
            numeric_imputer,
            numeric_scaler,
            categorical_imputer,
            encoder,
            categorical_scaler,
            scale_ordinal_codes: self.scale_ordinal_codes,
        })
    }

    /// Fit on `records` and return their transformed matrix
    pub fn fit_transform(
        &self,
        records: &[CensusRecord],
    ) -> Result<(Transformer, Array2<f64>), TransformError> {
        let transformer = self.fit(records)?;
        let features = transformer.transform(records)?;
        Ok((transformer, features))
    }
}

/// Preprocessor with frozen fit-time statistics
#[derive(Debug, Serialize, Deserialize)]
pub struct Transformer {
    numeric_imputer: MedianImputer,
    numeric_scaler: StandardScaler,
    categorical_imputer: MostFrequentImputer,
    encoder: OrdinalEncoder,
    categorical_scaler: StandardScaler,
    scale_ordinal_codes: bool,
}

impl Transformer {
    /// Transform records into an `n x FEATURE_COUNT` matrix
    pub fn transform(&self, records: &[CensusRecord]) -> Result<Array2<f64>, TransformError> {
        let mut numeric = impute_numeric(&self.numeric_imputer, records);
        self.numeric_scaler.transform(&mut numeric);

        let mut codes = encode_categorical(&self.categorical_imputer, &self.encoder, records)?;
        self.categorical_scaler.transform(&mut codes);

        let mut features = Array2::zeros((records.len(), FEATURE_COUNT));
        features.slice_mut(s![.., ..NUMERIC_COUNT]).assign(&numeric);
        features.slice_mut(s![.., NUMERIC_COUNT..]).assign(&codes);
        Ok(features)
    }

    /// Transform a single record into a `1 x FEATURE_COUNT` matrix
    pub fn transform_one(&self, record: &CensusRecord) -> Result<Array2<f64>, TransformError> {
        self.transform(std::slice::from_ref(record))
    }

    /// Check a reloaded transformer against the compiled vocabularies
    pub fn verify(&self) -> Result<(), TransformError> {
        self.encoder.verify()
    }

    /// Whether ordinal codes were standardized
    pub fn scales_ordinal_codes(&self) -> bool {
        self.scale_ordinal_codes
    }

    /// Fit-time medians of the numeric columns
    pub fn medians(&self) -> &[f64] {
        self.numeric_imputer.medians()
    }

    /// Fit-time modes of the categorical columns
    pub fn modes(&self) -> &[String] {
        self.categorical_imputer.modes()
    }
}

fn impute_numeric(imputer: &MedianImputer, records: &[CensusRecord]) -> Array2<f64> {
    Array2::from_shape_fn((records.len(), NUMERIC_COUNT), |(i, j)| {
        imputer.fill(j, records[i].numeric[j])
    })
}

fn encode_categorical(
    imputer: &MostFrequentImputer,
    encoder: &OrdinalEncoder,
    records: &[CensusRecord],
) -> Result<Array2<f64>, TransformError> {
    let mut codes = Array2::zeros((records.len(), CATEGORICAL_COUNT));
    for (i, record) in records.iter().enumerate() {
        for j in 0..CATEGORICAL_COUNT {
            let value = imputer.fill(j, record.categorical[j].as_deref());
            codes[[i, j]] = encoder.encode(j, value)?;
        }
    }
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_store::{ArtifactStore, MemoryArtifactStore};
    use census_schema::{ValidationError, CENSUS_SCHEMA};

    fn record(age: Option<f64>, workclass: Option<&str>, sex: &str) -> CensusRecord {
        CensusRecord {
            numeric: [age, Some(77516.0), Some(13.0), Some(0.0), Some(0.0), Some(40.0)],
            categorical: [
                workclass.map(str::to_string),
                Some("Never-married".to_string()),
                Some("Adm-clerical".to_string()),
                Some("Not-in-family".to_string()),
                Some("White".to_string()),
                Some(sex.to_string()),
                Some("United-States".to_string()),
            ],
        }
    }

    fn training_records() -> Vec<CensusRecord> {
        vec![
            record(Some(25.0), Some("Private"), "Male"),
            record(Some(35.0), Some("Private"), "Female"),
            record(None, Some("State-gov"), "Male"),
            record(Some(45.0), None, "Female"),
        ]
    }

    #[test]
    fn test_fit_transform_shape_and_order() {
        let (transformer, features) = TransformerBuilder::new(CENSUS_SCHEMA)
            .fit_transform(&training_records())
            .unwrap();
        assert_eq!(features.dim(), (4, FEATURE_COUNT));
        assert_eq!(transformer.medians()[0], 35.0);
        assert_eq!(transformer.modes()[0], "Private");

        // age column: [25, 35, 35 (imputed), 45] -> mean 35
        assert!((features[[1, 0]]).abs() < 1e-12);
        assert!((features[[2, 0]]).abs() < 1e-12);
        assert!(features[[0, 0]] < 0.0 && features[[3, 0]] > 0.0);

        // constant columns collapse to zero
        assert_eq!(features[[0, 1]], 0.0);
        assert_eq!(features[[0, 6 + 1]], 0.0);
    }

    #[test]
    fn test_transform_reproduces_fit_matrix() {
        let records = training_records();
        let (transformer, fitted) = TransformerBuilder::new(CENSUS_SCHEMA)
            .fit_transform(&records)
            .unwrap();
        let again = transformer.transform(&records).unwrap();
        assert_eq!(fitted, again);
    }

    #[test]
    fn test_statistics_come_from_fit_data_only() {
        let train = training_records();
        let transformer = TransformerBuilder::new(CENSUS_SCHEMA).fit(&train).unwrap();

        let test = vec![record(Some(90.0), None, "Male"), record(None, Some("Private"), "Male")];
        let features = transformer.transform(&test).unwrap();
        assert!(features[[0, 0]] > 0.0);
        // missing age imputes to the training median, which standardizes to 0
        assert!(features[[1, 0]].abs() < 1e-12);
        // missing workclass imputes to the training mode
        assert_eq!(features[[0, 6]], features[[1, 6]]);
        assert_eq!(transformer.medians()[0], 35.0);
    }

    #[test]
    fn test_unscaled_ordinal_codes() {
        let transformer = TransformerBuilder::new(CENSUS_SCHEMA)
            .scale_ordinal_codes(false)
            .fit(&training_records())
            .unwrap();
        assert!(!transformer.scales_ordinal_codes());

        let features = transformer
            .transform_one(&record(Some(30.0), Some("Never-worked"), "Female"))
            .unwrap();
        assert_eq!(features[[0, 6]], 7.0);
        assert_eq!(features[[0, 11]], 1.0);
        assert_eq!(features[[0, 12]], 0.0);
    }

    #[test]
    fn test_unknown_category_at_transform() {
        let transformer = TransformerBuilder::new(CENSUS_SCHEMA)
            .fit(&training_records())
            .unwrap();
        let err = transformer
            .transform_one(&record(Some(30.0), Some("Pirate"), "Male"))
            .unwrap_err();
        assert!(matches!(
            err,
            TransformError::Validation(ValidationError::UnknownCategory { column: "workclass", .. })
        ));
    }

    #[test]
    fn test_unknown_category_at_fit() {
        let mut records = training_records();
        records[0].categorical[4] = Some("Martian".to_string());
        let err = TransformerBuilder::new(CENSUS_SCHEMA).fit(&records).unwrap_err();
        assert!(matches!(
            err,
            TransformError::Validation(ValidationError::UnknownCategory { column: "race", .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            TransformerBuilder::new(CENSUS_SCHEMA).fit(&[]),
            Err(TransformError::EmptyInput)
        ));
    }

    #[test]
    fn test_round_trip_through_store() {
        let records = training_records();
        let (transformer, fitted) = TransformerBuilder::new(CENSUS_SCHEMA)
            .fit_transform(&records)
            .unwrap();

        let store = MemoryArtifactStore::new();
        store.save("preprocessor", &transformer).unwrap();
        let reloaded: Transformer = store.load("preprocessor").unwrap();

        reloaded.verify().unwrap();
        assert_eq!(reloaded.transform(&records).unwrap(), fitted);
    }
}
