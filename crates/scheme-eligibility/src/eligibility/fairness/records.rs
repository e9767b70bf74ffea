use std::io::Read;

use serde::Deserialize;

/// Errors raised while reading audit records from CSV.
#[derive(Debug, thiserror::Error)]
pub enum AuditInputError {
    #[error("audit csv is malformed: {0}")]
    Csv(#[from] csv::Error),
    #[error("prediction at index {index} must be 0 or 1 (found {found})")]
    InvalidPrediction { index: usize, found: u8 },
}

#[derive(Debug, Deserialize)]
struct AuditRow {
    prediction: u8,
    group: String,
}

/// Predictions and group labels aligned position-wise.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuditRecords {
    pub predictions: Vec<u8>,
    pub group_labels: Vec<String>,
}

impl AuditRecords {
    /// Accepts binary predictions only. Length mismatches are left to the audit, which degrades.
    pub fn new(
        predictions: Vec<u8>,
        group_labels: Vec<String>,
    ) -> Result<Self, AuditInputError> {
        if let Some((index, &found)) = predictions
            .iter()
            .enumerate()
            .find(|(_, prediction)| **prediction > 1)
        {
            return Err(AuditInputError::InvalidPrediction { index, found });
        }

        Ok(Self {
            predictions,
            group_labels,
        })
    }
}

/// Reads a `prediction,group` CSV with a header row.
pub fn read_audit_records<R: Read>(reader: R) -> Result<AuditRecords, AuditInputError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut predictions = Vec::new();
    let mut group_labels = Vec::new();

    for row in csv_reader.deserialize::<AuditRow>() {
        let row = row?;
        predictions.push(row.prediction);
        group_labels.push(row.group);
    }

    AuditRecords::new(predictions, group_labels)
}
