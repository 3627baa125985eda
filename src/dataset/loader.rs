//! CSV loading
//!
//! Reads the test-set export once. The header decides the feature order:
//! every column except the reserved ones, left to right.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use super::record::{
    ClientRecord, DECISION_COLUMN, ID_COLUMN, RESERVED_COLUMNS, RISK_COLUMN, TARGET_COLUMN,
};
use super::{Dataset, DatasetError};
use crate::scoring::Decision;

/// Positions of the reserved columns in the header
struct ReservedIndex {
    id: usize,
    risk: usize,
    decision: usize,
    target: usize,
}

pub fn load_path(path: &Path) -> Result<Dataset, DatasetError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    read(reader)
}

pub fn load_reader<R: Read>(input: R) -> Result<Dataset, DatasetError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    read(reader)
}

fn read<R: Read>(mut reader: csv::Reader<R>) -> Result<Dataset, DatasetError> {
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
    };

    let reserved = ReservedIndex {
        id: position(ID_COLUMN)?,
        risk: position(RISK_COLUMN)?,
        decision: position(DECISION_COLUMN)?,
        target: position(TARGET_COLUMN)?,
    };

    let feature_positions: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| !RESERVED_COLUMNS.contains(&name.as_str()))
        .map(|(i, _)| i)
        .collect();

    let feature_names: Vec<String> = feature_positions.iter().map(|&i| headers[i].clone()).collect();

    let mut records = Vec::new();
    let mut by_id = HashMap::new();

    for (line, row) in reader.records().enumerate() {
        let row = row?;
        // 1-based data row, header excluded
        let row_no = line + 1;

        let cell = |i: usize| row.get(i).unwrap_or("");

        let id = parse_id(cell(reserved.id))
            .ok_or_else(|| invalid(row_no, ID_COLUMN, cell(reserved.id)))?;

        // a probability: NaN and out-of-range scores are rejected
        let risk_score = parse_number(cell(reserved.risk))
            .filter(|v| (0.0..=1.0).contains(v))
            .ok_or_else(|| invalid(row_no, RISK_COLUMN, cell(reserved.risk)))?;

        let decision = Decision::parse(cell(reserved.decision))
            .ok_or_else(|| invalid(row_no, DECISION_COLUMN, cell(reserved.decision)))?;

        let real_target = parse_target(cell(reserved.target))
            .ok_or_else(|| invalid(row_no, TARGET_COLUMN, cell(reserved.target)))?;

        let features = feature_positions
            .iter()
            .map(|&i| parse_number(cell(i)).ok_or_else(|| invalid(row_no, &headers[i], cell(i))))
            .collect::<Result<Vec<f64>, _>>()?;

        if by_id.insert(id, records.len()).is_some() {
            return Err(DatasetError::DuplicateId(id));
        }

        records.push(ClientRecord {
            id,
            risk_score,
            decision,
            real_target,
            features,
        });
    }

    Ok(Dataset::new(headers.len(), feature_names, records))
}

fn invalid(row: usize, column: &str, value: &str) -> DatasetError {
    DatasetError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

/// Identifiers may have been exported as floats (`100001.0`)
fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().or_else(|| {
        let value: f64 = raw.parse().ok()?;
        (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
    })
}

fn parse_target(raw: &str) -> Option<u8> {
    match parse_number(raw)? {
        v if v == 0.0 => Some(0),
        v if v == 1.0 => Some(1),
        _ => None,
    }
}

/// Empty cells and `nan` are missing values; booleans count as 0/1
fn parse_number(raw: &str) -> Option<f64> {
    match raw {
        "" => Some(f64::NAN),
        "True" | "true" => Some(1.0),
        "False" | "false" => Some(0.0),
        _ if raw.eq_ignore_ascii_case("nan") => Some(f64::NAN),
        _ => raw.parse().ok(),
    }
}
