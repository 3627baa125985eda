//! Page-level view models

use serde::Serialize;

use super::charts::{self, BarChart, Gauge, Histogram, Pie, Scatter};
use crate::analysis::Analysis;
use crate::comparison::{self, ComparisonFilter, ComparisonSummary};
use crate::dataset::{Dataset, DatasetError};
use crate::scoring::Decision;

const HISTOGRAM_BINS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
    pub tone: Tone,
}

/// Inline status block (success, warning, error)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    pub tone: Tone,
    pub title: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub client_id: i64,
    pub metrics: Vec<Metric>,
    pub verdict: Banner,
    pub gauge: Gauge,
    pub shap: Option<BarChart>,
    pub shap_interpretation: Option<String>,
    pub interpretation: Banner,
    pub warnings: Vec<String>,
}

pub fn percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value * 100.0)
}

impl AnalysisView {
    pub fn from_analysis(analysis: &Analysis) -> Self {
        let prediction = &analysis.prediction;
        let decision = prediction.decision;
        let approved = decision.is_approved();

        let metrics = vec![
            Metric {
                label: "Default risk",
                value: percent(prediction.risk_score, 2),
                tone: Tone::Neutral,
            },
            Metric {
                label: "Decision",
                value: format!("{} {}", if approved { "🟢" } else { "🔴" }, decision),
                tone: if approved { Tone::Positive } else { Tone::Negative },
            },
            Metric {
                label: "Model threshold",
                value: percent(prediction.threshold, 1),
                tone: Tone::Neutral,
            },
            Metric {
                label: "Reality",
                value: analysis.reality_label().to_string(),
                tone: if analysis.real_target == 1 { Tone::Negative } else { Tone::Positive },
            },
        ];

        let verdict = if analysis.correct {
            Banner { tone: Tone::Positive, title: "✓ Correct prediction".to_string(), lines: Vec::new() }
        } else {
            Banner { tone: Tone::Negative, title: "⚠️ Incorrect prediction".to_string(), lines: Vec::new() }
        };

        let interpretation = match decision {
            Decision::Accord => Banner {
                tone: Tone::Positive,
                title: "Credit granted".to_string(),
                lines: vec![
                    format!("Risk: {} < Threshold: {}", percent(prediction.risk_score, 2), percent(prediction.threshold, 1)),
                    "Profile acceptable for granting credit".to_string(),
                ],
            },
            Decision::Refus => Banner {
                tone: Tone::Negative,
                title: "Credit refused".to_string(),
                lines: vec![
                    format!("Risk: {} ≥ Threshold: {}", percent(prediction.risk_score, 2), percent(prediction.threshold, 1)),
                    "Risk profile too high".to_string(),
                ],
            },
        };

        Self {
            client_id: analysis.client_id,
            metrics,
            verdict,
            gauge: charts::gauge(prediction.risk_score, prediction.threshold),
            shap: analysis.explanation.as_ref().map(charts::shap_chart),
            shap_interpretation: analysis.explanation.as_ref().map(|e| e.interpretation.clone()),
            interpretation,
            warnings: analysis.warnings.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonView {
    pub filter: ComparisonFilter,
    pub summary: ComparisonSummary,
    pub histogram: Histogram,
    /// Absent when the dataset has no age column
    pub scatter: Option<Scatter>,
    pub pie: Pie,
}

impl ComparisonView {
    /// Filter the dataset and build every comparison chart.
    ///
    /// `marker` is the selected client's risk score, shown on the histogram.
    pub fn build(
        dataset: &Dataset,
        filter: ComparisonFilter,
        marker: Option<f64>,
        scatter_sample_size: usize,
    ) -> Result<Self, DatasetError> {
        let subset = comparison::filter(dataset, &filter)?;

        Ok(Self {
            summary: comparison::summarize(&subset),
            histogram: charts::risk_histogram(&subset, HISTOGRAM_BINS, marker),
            scatter: charts::age_risk_scatter(dataset, &subset, scatter_sample_size).ok(),
            pie: charts::decision_pie(&subset),
            filter,
        })
    }

    /// Aggregates as display metrics, "n/a" for an empty subset
    pub fn metrics(&self) -> Vec<Metric> {
        let show = |value: Option<f64>| value.map_or_else(|| "n/a".to_string(), |v| percent(v, 1));

        vec![
            Metric { label: "Clients", value: self.summary.count.to_string(), tone: Tone::Neutral },
            Metric { label: "Mean risk", value: show(self.summary.mean_risk), tone: Tone::Neutral },
            Metric { label: "Approval rate", value: show(self.summary.approval_rate), tone: Tone::Positive },
            Metric { label: "Default rate", value: show(self.summary.default_rate), tone: Tone::Negative },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::Range;
    use crate::scoring::PredictionResult;

    fn analysis(risk: f64, decision: Decision, threshold: f64, real_target: u8) -> Analysis {
        let prediction = PredictionResult { risk_score: risk, decision, threshold };
        Analysis {
            client_id: 100001,
            consistent: prediction.is_consistent(),
            correct: matches!((decision, real_target), (Decision::Accord, 0) | (Decision::Refus, 1)),
            prediction,
            real_target,
            explanation: None,
            warnings: vec!["SHAP explanation unavailable".to_string()],
        }
    }

    #[test]
    fn test_accord_view() {
        let view = AnalysisView::from_analysis(&analysis(0.05, Decision::Accord, 0.09, 0));

        assert_eq!(view.metrics[0].value, "5.00%");
        assert_eq!(view.metrics[1].value, "🟢 ACCORD");
        assert_eq!(view.metrics[2].value, "9.0%");
        assert_eq!(view.metrics[3].value, "Good payer");
        assert_eq!(view.gauge.bar_color, charts::GREEN);
        assert_eq!(view.verdict.tone, Tone::Positive);
        assert_eq!(view.interpretation.title, "Credit granted");
        assert_eq!(view.interpretation.lines[0], "Risk: 5.00% < Threshold: 9.0%");
        assert!(view.shap.is_none());
        assert_eq!(view.warnings.len(), 1);
    }

    #[test]
    fn test_refus_view_flags_wrong_prediction() {
        let view = AnalysisView::from_analysis(&analysis(0.31, Decision::Refus, 0.09, 0));

        assert_eq!(view.gauge.bar_color, charts::RED);
        assert_eq!(view.verdict.tone, Tone::Negative);
        assert_eq!(view.interpretation.title, "Credit refused");
    }

    #[test]
    fn test_empty_comparison_metrics() {
        let csv = "SK_ID_CURR,DAYS_BIRTH,RISK_SCORE,DECISION,REAL_TARGET\n1,-9461,0.05,ACCORD,0\n";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        let filter = ComparisonFilter { age: Some(Range::new(60.0, 70.0)), income: None };

        let view = ComparisonView::build(&ds, filter, None, 100).unwrap();
        assert_eq!(view.summary.count, 0);
        assert!(view.pie.slices.is_empty());
        assert!(view.scatter.as_ref().unwrap().points.is_empty());
        assert_eq!(view.metrics()[1].value, "n/a");
    }
}
