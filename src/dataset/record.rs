use serde::Serialize;

use crate::scoring::Decision;

/// Identifier column
pub const ID_COLUMN: &str = "SK_ID_CURR";
/// Precomputed risk score column
pub const RISK_COLUMN: &str = "RISK_SCORE";
/// Precomputed decision column
pub const DECISION_COLUMN: &str = "DECISION";
/// Ground-truth label column (1 = default)
pub const TARGET_COLUMN: &str = "REAL_TARGET";

/// Columns that never go into the feature vector
pub const RESERVED_COLUMNS: [&str; 4] = [ID_COLUMN, RISK_COLUMN, DECISION_COLUMN, TARGET_COLUMN];

/// One test-set client
#[derive(Debug, Clone, Serialize)]
pub struct ClientRecord {
    pub id: i64,
    pub risk_score: f64,
    pub decision: Decision,
    pub real_target: u8,
    /// Feature values in CSV column order, NaN where the cell was empty
    #[serde(skip_serializing)]
    pub features: Vec<f64>,
}

impl ClientRecord {
    pub fn is_default(&self) -> bool {
        self.real_target == 1
    }

    /// A decision is right when it approves a good payer or refuses a defaulter
    pub fn is_correct(&self, decision: Decision) -> bool {
        match decision {
            Decision::Accord => !self.is_default(),
            Decision::Refus => self.is_default(),
        }
    }
}
