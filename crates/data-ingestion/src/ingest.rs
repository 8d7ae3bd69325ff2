//! Source Reading and Split Persistence

use crate::split::TrainTestSplit;
use crate::IngestionError;
use artifact_store::write_atomic;
use census_schema::Validator;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Source dataset (CSV with header)
    pub source_path: PathBuf,
    /// Directory receiving raw.csv, train.csv, test.csv
    pub artifacts_dir: PathBuf,
    /// Fraction of rows held out for testing
    pub test_ratio: f64,
    /// Seed for the split permutation
    pub seed: u64,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("data/adult.csv"),
            artifacts_dir: PathBuf::from("artifacts"),
            test_ratio: 0.30,
            seed: 42,
        }
    }
}

/// Locations and sizes of the written splits
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestionOutput {
    pub raw_path: PathBuf,
    pub train_path: PathBuf,
    pub test_path: PathBuf,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// First rows of the source dataset
#[derive(Debug, Clone, Serialize)]
pub struct DatasetPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Reads the source dataset and writes raw/train/test artifacts
pub struct DataIngestion {
    config: IngestionConfig,
    validator: Validator,
}

impl DataIngestion {
    /// Create a new ingestion stage
    pub fn new(config: IngestionConfig) -> Self {
        Self {
            config,
            validator: Validator::default(),
        }
    }

    /// Path of the raw copy
    pub fn raw_path(&self) -> PathBuf {
        self.config.artifacts_dir.join("raw.csv")
    }

    /// Path of the training split
    pub fn train_path(&self) -> PathBuf {
        self.config.artifacts_dir.join("train.csv")
    }

    /// Path of the test split
    pub fn test_path(&self) -> PathBuf {
        self.config.artifacts_dir.join("test.csv")
    }

    /// Read the source, persist a raw copy, split, and persist both splits.
    ///
    /// Writes are not rolled back if a later one fails.
    pub fn ingest(&self) -> Result<IngestionOutput, IngestionError> {
        info!("Data ingestion started from {}", self.config.source_path.display());

        let (headers, rows) = self.read_source()?;
        self.validator.validate_header(&headers)?;
        debug!("Source read: {} rows, {} columns", rows.len(), headers.len());

        let splitter = TrainTestSplit::new(self.config.test_ratio, self.config.seed);
        let split = splitter.split(rows.len())?;

        let raw_path = self.raw_path();
        write_csv(&raw_path, &headers, rows.iter())?;

        info!(
            "Train test split: {} train / {} test (seed {})",
            split.train.len(),
            split.test.len(),
            self.config.seed
        );

        let train_path = self.train_path();
        let test_path = self.test_path();
        write_csv(&train_path, &headers, split.train.iter().map(|&i| &rows[i]))?;
        write_csv(&test_path, &headers, split.test.iter().map(|&i| &rows[i]))?;

        info!("Ingestion of data is completed");
        Ok(IngestionOutput {
            raw_path,
            train_path,
            test_path,
            train_rows: split.train.len(),
            test_rows: split.test.len(),
        })
    }

    /// First `limit` rows of the source dataset, trimmed for display
    pub fn preview(&self, limit: usize) -> Result<DatasetPreview, IngestionError> {
        let path = &self.config.source_path;
        let mut reader = open_reader(path)?;
        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| read_error(path, e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in reader.records().take(limit) {
            let record = result.map_err(|e| read_error(path, e))?;
            rows.push(record.iter().map(|v| v.trim().to_string()).collect());
        }
        Ok(DatasetPreview { headers, rows })
    }

    fn read_source(&self) -> Result<(StringRecord, Vec<StringRecord>), IngestionError> {
        let path = &self.config.source_path;
        let mut reader = open_reader(path)?;
        let headers = reader.headers().map_err(|e| read_error(path, e))?.clone();
        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| read_error(path, e))?;
        if rows.is_empty() {
            warn!("Source dataset {} has no rows", path.display());
        }
        Ok((headers, rows))
    }
}

fn open_reader(path: &Path) -> Result<csv::Reader<File>, IngestionError> {
    let file = File::open(path).map_err(|source| IngestionError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ReaderBuilder::new().has_headers(true).from_reader(file))
}

fn write_csv<'a>(
    path: &Path,
    headers: &StringRecord,
    rows: impl Iterator<Item = &'a StringRecord>,
) -> Result<(), IngestionError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(headers).map_err(|e| write_error(path, e))?;
    for row in rows {
        writer.write_record(row).map_err(|e| write_error(path, e))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| IngestionError::SplitUnwritable {
            path: path.to_path_buf(),
            source: std::io::Error::new(e.error().kind(), e.error().to_string()),
        })?;
    write_atomic(path, &bytes)?;
    debug!("Wrote {}", path.display());
    Ok(())
}

fn read_error(path: &Path, err: csv::Error) -> IngestionError {
    match io_source(err) {
        Ok(source) => IngestionError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        },
        Err(reason) => IngestionError::Malformed {
            path: path.to_path_buf(),
            reason,
        },
    }
}

fn write_error(path: &Path, err: csv::Error) -> IngestionError {
    match io_source(err) {
        Ok(source) => IngestionError::SplitUnwritable {
            path: path.to_path_buf(),
            source,
        },
        Err(reason) => IngestionError::Malformed {
            path: path.to_path_buf(),
            reason,
        },
    }
}

/// The underlying I/O error, or the CSV error message
fn io_source(err: csv::Error) -> Result<std::io::Error, String> {
    if !err.is_io_error() {
        return Err(err.to_string());
    }
    match err.into_kind() {
        csv::ErrorKind::Io(source) => Ok(source),
        other => Err(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use census_schema::{LabelledFrame, CENSUS_SCHEMA};
    use std::fs;

    const HEADER: &str = concat!(
        "age,workclass,fnlwgt,education,education_num,marital_status,occupation,",
        "relationship,race,sex,capital_gain,capital_loss,hours_per_week,native_country,income"
    );

    fn write_source(dir: &Path, rows: usize) -> PathBuf {
        let mut content = String::from(HEADER);
        content.push('\n');
        for i in 0..rows {
            let label = if i % 3 == 0 { ">50K" } else { "<=50K" };
            content.push_str(&format!(
                "{}, Private, {}, HS-grad, 9, Never-married, Sales, Own-child, White, Female, \
                 0, 0, {}, United-States, {}\n",
                20 + i,
                100000 + i * 17,
                30 + i % 20,
                label
            ));
        }
        let path = dir.join("adult.csv");
        fs::write(&path, content).unwrap();
        path
    }

    fn config(dir: &Path, source: PathBuf) -> IngestionConfig {
        IngestionConfig {
            source_path: source,
            artifacts_dir: dir.join("artifacts"),
            ..Default::default()
        }
    }

    #[test]
    fn test_ingest_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), 20);
        let ingestion = DataIngestion::new(config(dir.path(), source));

        let output = ingestion.ingest().unwrap();
        assert_eq!(output.train_rows, 14);
        assert_eq!(output.test_rows, 6);
        assert!(output.raw_path.ends_with("raw.csv"));

        let train = LabelledFrame::from_path(&CENSUS_SCHEMA, &output.train_path).unwrap();
        let test = LabelledFrame::from_path(&CENSUS_SCHEMA, &output.test_path).unwrap();
        let raw = LabelledFrame::from_path(&CENSUS_SCHEMA, &output.raw_path).unwrap();
        assert_eq!(train.len(), 14);
        assert_eq!(test.len(), 6);
        assert_eq!(raw.len(), 20);

        let raw_text = fs::read_to_string(&output.raw_path).unwrap();
        assert!(raw_text.starts_with(HEADER));
    }

    #[test]
    fn test_ingest_is_byte_identical_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), 50);
        let ingestion = DataIngestion::new(config(dir.path(), source.clone()));

        let first = ingestion.ingest().unwrap();
        let train_a = fs::read(&first.train_path).unwrap();
        let test_a = fs::read(&first.test_path).unwrap();

        let other_dir = tempfile::tempdir().unwrap();
        let second = DataIngestion::new(config(other_dir.path(), source))
            .ingest()
            .unwrap();
        assert_eq!(train_a, fs::read(&second.train_path).unwrap());
        assert_eq!(test_a, fs::read(&second.test_path).unwrap());
    }

    #[test]
    fn test_splits_are_disjoint() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), 30);
        let output = DataIngestion::new(config(dir.path(), source)).ingest().unwrap();

        let ages = |path: &Path| -> Vec<f64> {
            LabelledFrame::from_path(&CENSUS_SCHEMA, path)
                .unwrap()
                .records
                .iter()
                .map(|r| r.numeric[0].unwrap())
                .collect()
        };
        let train = ages(&output.train_path);
        let test = ages(&output.test_path);
        assert!(train.iter().all(|a| !test.contains(a)));
        assert_eq!(train.len() + test.len(), 30);
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let ingestion = DataIngestion::new(config(dir.path(), dir.path().join("absent.csv")));
        assert!(matches!(
            ingestion.ingest(),
            Err(IngestionError::SourceUnreadable { .. })
        ));
        assert!(!ingestion.raw_path().exists());
    }

    #[test]
    fn test_header_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("bad.csv");
        fs::write(&source, "age,income\n39,<=50K\n40,>50K\n").unwrap();
        let result = DataIngestion::new(config(dir.path(), source)).ingest();
        assert!(matches!(result, Err(IngestionError::Schema(_))));
    }

    #[test]
    fn test_too_few_rows() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), 1);
        let result = DataIngestion::new(config(dir.path(), source)).ingest();
        assert!(matches!(result, Err(IngestionError::TooFewRows(1))));
    }

    #[test]
    fn test_csv_io_failures_are_not_malformed() {
        let path = Path::new("adult.csv");
        let io = || csv::Error::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));

        assert!(matches!(
            read_error(path, io()),
            IngestionError::SourceUnreadable { .. }
        ));
        assert!(matches!(
            write_error(path, io()),
            IngestionError::SplitUnwritable { .. }
        ));
    }

    #[test]
    fn test_ragged_source_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), 5);
        let mut content = fs::read_to_string(&source).unwrap();
        content.push_str("1,2,3\n");
        fs::write(&source, content).unwrap();

        let result = DataIngestion::new(config(dir.path(), source)).ingest();
        assert!(matches!(result, Err(IngestionError::Malformed { .. })));
    }

    #[test]
    fn test_preview() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), 10);
        let preview = DataIngestion::new(config(dir.path(), source)).preview(3).unwrap();
        assert_eq!(preview.headers.len(), 15);
        assert_eq!(preview.rows.len(), 3);
        assert_eq!(preview.rows[0][0], "20");
        assert_eq!(preview.rows[0][1], "Private");
    }
}
