//! Wire types of the remote scoring API

use serde::{Deserialize, Serialize};
use std::fmt;

/// Threshold assumed when `/predict` does not echo one back
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Credit decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "ACCORD")]
    Accord,
    #[serde(rename = "REFUS")]
    Refus,
}

impl Decision {
    /// `ACCORD` iff the risk is strictly below the threshold
    pub fn from_risk(risk_score: f64, threshold: f64) -> Self {
        if risk_score < threshold {
            Decision::Accord
        } else {
            Decision::Refus
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accord => "ACCORD",
            Decision::Refus => "REFUS",
        }
    }

    /// Parse the label used by the API and the dataset
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "ACCORD" => Some(Decision::Accord),
            "REFUS" => Some(Decision::Refus),
            _ => None,
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Decision::Accord)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `GET /status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiStatus {
    pub status: String,
}

impl ApiStatus {
    pub fn is_operational(&self) -> bool {
        self.status == "operational"
    }
}

/// `GET /model/info`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub auc_score: Option<f64>,
    #[serde(default)]
    pub optimal_threshold: Option<f64>,
    #[serde(default)]
    pub optimal_cost: Option<f64>,
    #[serde(default)]
    pub num_features: Option<usize>,
}

impl ModelInfo {
    /// One-line banner shown above the dashboard
    pub fn summary(&self) -> String {
        match (&self.model_type, self.auc_score) {
            (Some(model_type), Some(auc)) => format!(
                "Model: {} | AUC: {:.4} | Cost: {}€ | Threshold: {:.1}%",
                model_type.to_uppercase(),
                auc,
                group_thousands(self.optimal_cost.unwrap_or(0.0)),
                self.optimal_threshold.unwrap_or(DEFAULT_THRESHOLD) * 100.0,
            ),
            _ => format!(
                "Model connected | Features: {}",
                self.num_features.map_or_else(|| "unknown".to_string(), |n| n.to_string())
            ),
        }
    }
}

/// Body of `POST /predict` and `POST /explain`.
///
/// Missing cells are NaN and go out as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct FeaturesRequest<'a> {
    pub features: &'a [f64],
}

/// `POST /predict`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub risk_score: f64,
    pub decision: Decision,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl PredictionResult {
    /// Decision implied by `risk_score` and `threshold`
    pub fn expected_decision(&self) -> Decision {
        Decision::from_risk(self.risk_score, self.threshold)
    }

    /// Whether the declared decision agrees with the threshold rule
    pub fn is_consistent(&self) -> bool {
        self.decision == self.expected_decision()
    }
}

/// Direction label attached to a SHAP impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactDirection {
    #[serde(rename = "AUGMENTE LE RISQUE")]
    IncreasesRisk,
    #[serde(rename = "DIMINUE LE RISQUE")]
    DecreasesRisk,
    #[serde(other)]
    Unknown,
}

impl ImpactDirection {
    /// Fallback when the server sends an unrecognised label
    pub fn from_impact(impact: f64) -> Self {
        if impact > 0.0 {
            ImpactDirection::IncreasesRisk
        } else {
            ImpactDirection::DecreasesRisk
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureImpact {
    pub feature: String,
    pub impact: f64,
    pub direction: ImpactDirection,
}

/// `POST /explain`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub top_features: Vec<FeatureImpact>,
    #[serde(default)]
    pub interpretation: String,
}

fn group_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0 {
        out.insert(0, '-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_threshold_rule() {
        assert_eq!(Decision::from_risk(0.05, 0.09), Decision::Accord);
        assert_eq!(Decision::from_risk(0.09, 0.09), Decision::Refus);
        assert_eq!(Decision::from_risk(0.5, 0.09), Decision::Refus);
    }

    #[test]
    fn test_prediction_defaults_threshold() {
        let result: PredictionResult =
            serde_json::from_str(r#"{"risk_score": 0.3, "decision": "ACCORD"}"#).unwrap();
        assert_eq!(result.threshold, DEFAULT_THRESHOLD);
        assert!(result.is_consistent());
    }

    #[test]
    fn test_inconsistent_prediction_is_flagged() {
        let result: PredictionResult = serde_json::from_str(
            r#"{"risk_score": 0.2, "decision": "ACCORD", "threshold": 0.09}"#,
        )
        .unwrap();
        assert_eq!(result.expected_decision(), Decision::Refus);
        assert!(!result.is_consistent());
    }

    #[test]
    fn test_explanation_directions() {
        let explanation: Explanation = serde_json::from_str(
            r#"{
                "top_features": [
                    {"feature": "EXT_SOURCE_3", "impact": -0.42, "direction": "DIMINUE LE RISQUE"},
                    {"feature": "DAYS_BIRTH", "impact": 0.13, "direction": "AUGMENTE LE RISQUE"},
                    {"feature": "AMT_CREDIT", "impact": 0.01, "direction": "NEUTRE"}
                ],
                "interpretation": "Low external score drives the risk."
            }"#,
        )
        .unwrap();
        assert_eq!(explanation.top_features.len(), 3);
        assert_eq!(explanation.top_features[0].direction, ImpactDirection::DecreasesRisk);
        assert_eq!(explanation.top_features[1].direction, ImpactDirection::IncreasesRisk);
        assert_eq!(explanation.top_features[2].direction, ImpactDirection::Unknown);
    }

    #[test]
    fn test_features_request_serializes_nan_as_null() {
        let features = [1.0, f64::NAN, -3.5];
        let body = serde_json::to_string(&FeaturesRequest { features: &features }).unwrap();
        assert_eq!(body, r#"{"features":[1.0,null,-3.5]}"#);
    }

    #[test]
    fn test_model_info_summary() {
        let info = ModelInfo {
            model_type: Some("lightgbm".to_string()),
            auc_score: Some(0.78123),
            optimal_threshold: Some(0.09),
            optimal_cost: Some(31250.0),
            num_features: Some(254),
        };
        assert_eq!(
            info.summary(),
            "Model: LIGHTGBM | AUC: 0.7812 | Cost: 31,250€ | Threshold: 9.0%"
        );

        let partial = ModelInfo { num_features: Some(254), ..Default::default() };
        assert_eq!(partial.summary(), "Model connected | Features: 254");
    }
}
