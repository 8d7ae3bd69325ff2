//! Labelled Frames Read from CSV

use crate::error::ValidationError;
use crate::record::{normalize_cell, parse_numeric, CensusRecord, IncomeClass};
use crate::schema::{CensusSchema, CATEGORICAL_COUNT, NUMERIC_COUNT};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Column positions resolved against a header row
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    schema: CensusSchema,
    numeric: [usize; NUMERIC_COUNT],
    categorical: [usize; CATEGORICAL_COUNT],
    label: usize,
}

impl HeaderIndex {
    /// Resolve every required column, failing on the first absent one
    pub fn resolve(
        schema: &CensusSchema,
        headers: &StringRecord,
    ) -> Result<Self, ValidationError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(ValidationError::MissingColumn(name))
        };

        let mut numeric = [0; NUMERIC_COUNT];
        for (slot, name) in numeric.iter_mut().zip(schema.numeric.iter()) {
            *slot = find(*name)?;
        }
        let mut categorical = [0; CATEGORICAL_COUNT];
        for (slot, column) in categorical.iter_mut().zip(schema.categorical.iter()) {
            *slot = find(column.name)?;
        }
        let label = find(schema.label)?;

        Ok(Self {
            schema: *schema,
            numeric,
            categorical,
            label,
        })
    }

    fn parse_features(
        &self,
        row: usize,
        record: &StringRecord,
    ) -> Result<CensusRecord, ValidationError> {
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let mut parsed = CensusRecord::default();
        let numeric = self.numeric.iter().zip(self.schema.numeric.iter());
        for (i, (&idx, &name)) in numeric.enumerate() {
            parsed.numeric[i] = parse_numeric(row, name, cell(idx))?;
        }
        for (i, &idx) in self.categorical.iter().enumerate() {
            parsed.categorical[i] = normalize_cell(cell(idx)).map(str::to_string);
        }
        Ok(parsed)
    }

    /// Parse features and the income label of one row
    pub fn parse_labelled(
        &self,
        row: usize,
        record: &StringRecord,
    ) -> Result<(CensusRecord, IncomeClass), ValidationError> {
        let features = self.parse_features(row, record)?;
        let raw_label = record.get(self.label).unwrap_or("");
        let label = match normalize_cell(raw_label) {
            None => return Err(ValidationError::MissingLabel { row }),
            Some(value) => IncomeClass::from_label(value).ok_or_else(|| {
                ValidationError::InvalidLabel {
                    row,
                    value: value.to_string(),
                }
            })?,
        };
        Ok((features, label))
    }
}

/// Feature records with their income labels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelledFrame {
    pub records: Vec<CensusRecord>,
    pub labels: Vec<IncomeClass>,
}

impl LabelledFrame {
    /// Read a labelled CSV file with a header row
    pub fn from_path(schema: &CensusSchema, path: &Path) -> Result<Self, ValidationError> {
        let file = File::open(path).map_err(|source| ValidationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let frame = Self::from_reader(schema, file)?;
        debug!("Read {} rows from {}", frame.len(), path.display());
        Ok(frame)
    }

    /// Read labelled CSV content with a header row
    pub fn from_reader<R: Read>(
        schema: &CensusSchema,
        reader: R,
    ) -> Result<Self, ValidationError> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let headers = reader.headers().map_err(read_error)?.clone();
        let index = HeaderIndex::resolve(schema, &headers)?;

        let mut frame = LabelledFrame::default();
        for (row, result) in reader.records().enumerate() {
            let record = result.map_err(read_error)?;
            let (features, label) = index.parse_labelled(row, &record)?;
            frame.records.push(features);
            frame.labels.push(label);
        }
        Ok(frame)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the frame holds no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Labels as model targets (0.0 / 1.0)
    pub fn targets(&self) -> Vec<f64> {
        self.labels.iter().map(|l| l.code() as f64).collect()
    }
}

fn read_error(err: csv::Error) -> ValidationError {
    if !err.is_io_error() {
        return ValidationError::Malformed(err.to_string());
    }
    match err.into_kind() {
        csv::ErrorKind::Io(source) => ValidationError::Read(source),
        other => ValidationError::Malformed(format!("{:?}", other)),
    }
}
