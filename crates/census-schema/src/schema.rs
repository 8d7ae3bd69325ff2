//! Static Column Layout and Vocabularies
//!
//! The column grouping and the ordered category lists are design-time
//! constants. Ordinal codes are positions in these lists, so reordering an
//! entry invalidates every persisted preprocessor.

/// Number of numeric input columns
pub const NUMERIC_COUNT: usize = 6;

/// Number of categorical input columns
pub const CATEGORICAL_COUNT: usize = 7;

/// Width of a transformed feature row
pub const FEATURE_COUNT: usize = NUMERIC_COUNT + CATEGORICAL_COUNT;

/// Marker used by the source data for an unknown value
pub const MISSING_SENTINEL: &str = "?";

/// Numeric columns in output order
pub const NUMERIC_COLUMNS: [&str; NUMERIC_COUNT] = [
    "age",
    "fnlwgt",
    "education_num",
    "capital_gain",
    "capital_loss",
    "hours_per_week",
];

/// Target column
pub const LABEL_COLUMN: &str = "income";

/// Columns present in the source but never used as features
pub const DROPPED_COLUMNS: [&str; 1] = ["education"];

const WORKCLASS: &[&str] = &[
    "State-gov",
    "Self-emp-not-inc",
    "Private",
    "Federal-gov",
    "Local-gov",
    "Self-emp-inc",
    "Without-pay",
    "Never-worked",
];

const MARITAL_STATUS: &[&str] = &[
    "Never-married",
    "Married-civ-spouse",
    "Divorced",
    "Married-spouse-absent",
    "Separated",
    "Married-AF-spouse",
    "Widowed",
];

const OCCUPATION: &[&str] = &[
    "Adm-clerical",
    "Exec-managerial",
    "Handlers-cleaners",
    "Prof-specialty",
    "Other-service",
    "Sales",
    "Craft-repair",
    "Transport-moving",
    "Farming-fishing",
    "Machine-op-inspct",
    "Tech-support",
    "Protective-serv",
    "Armed-Forces",
    "Priv-house-serv",
];

const RELATIONSHIP: &[&str] = &[
    "Not-in-family",
    "Husband",
    "Wife",
    "Own-child",
    "Unmarried",
    "Other-relative",
];

const RACE: &[&str] = &[
    "White",
    "Black",
    "Asian-Pac-Islander",
    "Amer-Indian-Eskimo",
    "Other",
];

const SEX: &[&str] = &["Male", "Female"];

const NATIVE_COUNTRY: &[&str] = &[
    "United-States",
    "Cuba",
    "Jamaica",
    "India",
    "Mexico",
    "South",
    "Puerto-Rico",
    "Honduras",
    "England",
    "Canada",
    "Germany",
    "Iran",
    "Philippines",
    "Italy",
    "Poland",
    "Columbia",
    "Cambodia",
    "Thailand",
    "Ecuador",
    "Laos",
    "Taiwan",
    "Haiti",
    "Portugal",
    "Dominican-Republic",
    "El-Salvador",
    "France",
    "Guatemala",
    "China",
    "Japan",
    "Yugoslavia",
    "Peru",
    "Outlying-US(Guam-USVI-etc)",
    "Scotland",
    "Trinadad&Tobago",
    "Greece",
    "Nicaragua",
    "Vietnam",
    "Hong",
    "Ireland",
    "Hungary",
    "Holand-Netherlands",
];

/// A categorical column and its ordered vocabulary
#[derive(Debug, Clone, Copy)]
pub struct CategoricalColumn {
    /// Column name in the source header
    pub name: &'static str,
    /// Known values; the index is the ordinal code
    pub vocabulary: &'static [&'static str],
}

impl CategoricalColumn {
    /// Ordinal position of a value, if it belongs to the vocabulary
    pub fn position(&self, value: &str) -> Option<usize> {
        self.vocabulary.iter().position(|v| *v == value)
    }
}

/// Complete column layout of the census dataset
#[derive(Debug, Clone, Copy)]
pub struct CensusSchema {
    pub numeric: &'static [&'static str; NUMERIC_COUNT],
    pub categorical: &'static [CategoricalColumn; CATEGORICAL_COUNT],
    pub label: &'static str,
    pub dropped: &'static [&'static str],
}

/// The single schema shared by ingestion, transformation, and prediction
pub static CENSUS_SCHEMA: CensusSchema = CensusSchema {
    numeric: &NUMERIC_COLUMNS,
    categorical: &[
        CategoricalColumn {
            name: "workclass",
            vocabulary: WORKCLASS,
        },
        CategoricalColumn {
            name: "marital_status",
            vocabulary: MARITAL_STATUS,
        },
        CategoricalColumn {
            name: "occupation",
            vocabulary: OCCUPATION,
        },
        CategoricalColumn {
            name: "relationship",
            vocabulary: RELATIONSHIP,
        },
        CategoricalColumn {
            name: "race",
            vocabulary: RACE,
        },
        CategoricalColumn {
            name: "sex",
            vocabulary: SEX,
        },
        CategoricalColumn {
            name: "native_country",
            vocabulary: NATIVE_COUNTRY,
        },
    ],
    label: LABEL_COLUMN,
    dropped: &DROPPED_COLUMNS,
};

impl CensusSchema {
    /// Names of every feature column in output order
    pub fn feature_names(&self) -> Vec<&'static str> {
        self.numeric
            .iter()
            .copied()
            .chain(self.categorical.iter().map(|c| c.name))
            .collect()
    }

    /// Columns a training file must carry
    pub fn required_columns(&self) -> Vec<&'static str> {
        let mut columns = self.feature_names();
        columns.push(self.label);
        columns
    }

    /// Look up a categorical column by name
    pub fn categorical_column(&self, name: &str) -> Option<&CategoricalColumn> {
        self.categorical.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_order() {
        let names = CENSUS_SCHEMA.feature_names();
        assert_eq!(names.len(), FEATURE_COUNT);
        assert_eq!(names[0], "age");
        assert_eq!(names[5], "hours_per_week");
        assert_eq!(names[6], "workclass");
        assert_eq!(names[12], "native_country");
    }

    #[test]
    fn test_vocabulary_positions() {
        let sex = CENSUS_SCHEMA.categorical_column("sex").unwrap();
        assert_eq!(sex.position("Male"), Some(0));
        assert_eq!(sex.position("Female"), Some(1));
        assert_eq!(sex.position("male"), None);

        let country = CENSUS_SCHEMA.categorical_column("native_country").unwrap();
        assert_eq!(country.vocabulary.len(), 41);
        assert_eq!(country.position("Holand-Netherlands"), Some(40));
    }

    #[test]
    fn test_vocabularies_have_no_duplicates() {
        for column in CENSUS_SCHEMA.categorical {
            let mut seen = std::collections::HashSet::new();
            for value in column.vocabulary {
                assert!(seen.insert(*value), "{} repeats {}", column.name, value);
            }
        }
    }

    #[test]
    fn test_required_columns_exclude_dropped() {
        let required = CENSUS_SCHEMA.required_columns();
        assert!(required.contains(&"income"));
        assert!(!required.contains(&"education"));
    }
}
