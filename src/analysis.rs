//! Prediction orchestration
//!
//! Looks up a client, scores it, then asks for an explanation. Scoring must
//! succeed; the explanation is best-effort.

use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::{AppError, AppResult};
use crate::scoring::{Decision, Explanation, PredictionResult, ScoringClient};

/// Outcome of analysing one client
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub client_id: i64,
    pub prediction: PredictionResult,
    /// Ground truth from the test set (1 = default)
    pub real_target: u8,
    /// Server decision agrees with the ground truth
    pub correct: bool,
    /// Server decision agrees with `risk_score < threshold`
    pub consistent: bool,
    pub explanation: Option<Explanation>,
    pub warnings: Vec<String>,
}

impl Analysis {
    pub fn decision(&self) -> Decision {
        self.prediction.decision
    }

    pub fn reality_label(&self) -> &'static str {
        if self.real_target == 1 { "Default" } else { "Good payer" }
    }
}

/// Score `client_id` and fetch its explanation.
///
/// `expected_features` is the model's declared input width, when known.
pub async fn analyze(
    scoring: &ScoringClient,
    dataset: &Dataset,
    client_id: i64,
    expected_features: Option<usize>,
) -> AppResult<Analysis> {
    let record = dataset.get(client_id)?;
    let features = record.features.as_slice();

    if let Some(expected) = expected_features {
        if expected != features.len() {
            return Err(AppError::SchemaMismatch {
                expected,
                actual: features.len(),
            });
        }
    }

    let prediction = scoring.predict(features).await?;

    tracing::info!(
        client_id,
        risk_score = prediction.risk_score,
        decision = %prediction.decision,
        threshold = prediction.threshold,
        "Client scored"
    );

    let mut warnings = Vec::new();

    let consistent = prediction.is_consistent();
    if !consistent {
        tracing::warn!(
            client_id,
            "Declared decision {} disagrees with threshold rule ({})",
            prediction.decision,
            prediction.expected_decision()
        );
        warnings.push(format!(
            "Declared decision {} does not match risk {:.2}% against threshold {:.1}%",
            prediction.decision,
            prediction.risk_score * 100.0,
            prediction.threshold * 100.0
        ));
    }

    let explanation = match scoring.explain(features).await {
        Ok(explanation) => Some(explanation),
        Err(e) => {
            tracing::warn!(client_id, "Explanation unavailable: {}", e);
            warnings.push("SHAP explanation unavailable".to_string());
            None
        }
    };

    Ok(Analysis {
        client_id,
        correct: record.is_correct(prediction.decision),
        real_target: record.real_target,
        consistent,
        prediction,
        explanation,
        warnings,
    })
}
