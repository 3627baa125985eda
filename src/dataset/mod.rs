//! Dataset Module - Test-set clients
//!
//! Immutable in-memory table of the scored test set. Loaded once at startup
//! and shared behind an `Arc`.

pub mod loader;
pub mod record;


pub use record::{ClientRecord, RESERVED_COLUMNS};

use std::collections::HashMap;
use std::path::Path;

/// Dataset errors
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Cannot read dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("Invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue { row: usize, column: String, value: String },

    #[error("Duplicate client id {0}")]
    DuplicateId(i64),

    #[error("Client {0} not found")]
    MissingRecord(i64),
}

/// Loaded test set
#[derive(Debug, Clone)]
pub struct Dataset {
    total_columns: usize,
    feature_names: Vec<String>,
    feature_index: HashMap<String, usize>,
    records: Vec<ClientRecord>,
    by_id: HashMap<i64, usize>,
}

impl Dataset {
    pub(crate) fn new(total_columns: usize, feature_names: Vec<String>, records: Vec<ClientRecord>) -> Self {
        let feature_index = feature_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        let by_id = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id, i))
            .collect();

        Self {
            total_columns,
            feature_names,
            feature_index,
            records,
            by_id,
        }
    }

    /// Load the CSV at `path`
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let dataset = loader::load_path(path)?;
        tracing::info!(
            "Loaded {} clients with {} features from {}",
            dataset.len(),
            dataset.feature_count(),
            path.display()
        );
        Ok(dataset)
    }

    /// Load from any CSV source
    pub fn from_reader<R: std::io::Read>(input: R) -> Result<Self, DatasetError> {
        loader::load_reader(input)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of columns in the CSV, reserved ones included
    pub fn total_columns(&self) -> usize {
        self.total_columns
    }

    /// Length of every feature vector
    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn records(&self) -> &[ClientRecord] {
        &self.records
    }

    /// Sorted unique identifiers, for the client selector
    pub fn client_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.records.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids
    }

    pub fn get(&self, id: i64) -> Result<&ClientRecord, DatasetError> {
        self.by_id
            .get(&id)
            .map(|&i| &self.records[i])
            .ok_or(DatasetError::MissingRecord(id))
    }

    /// Feature vector in the order the scoring model expects
    pub fn feature_vector(&self, id: i64) -> Result<&[f64], DatasetError> {
        self.get(id).map(|r| r.features.as_slice())
    }

    /// Position of a feature column
    pub fn column(&self, name: &str) -> Result<usize, DatasetError> {
        self.feature_index
            .get(name)
            .copied()
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
    }
}
