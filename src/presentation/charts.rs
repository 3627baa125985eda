//! Chart view models
//!
//! Plain data shared by the HTML renderer and the JSON API.

use serde::Serialize;

use crate::comparison::{age_years, AGE_COLUMN};
use crate::dataset::{ClientRecord, Dataset, DatasetError};
use crate::scoring::{Decision, Explanation, ImpactDirection};

pub const GREEN: &str = "green";
pub const RED: &str = "red";
pub const LIGHT_GREEN: &str = "lightgreen";
pub const LIGHT_CORAL: &str = "lightcoral";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeStep {
    pub from: f64,
    pub to: f64,
    pub color: &'static str,
}

/// Risk gauge on a 0-100 axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub value: f64,
    pub axis_max: f64,
    pub threshold: f64,
    pub bar_color: &'static str,
    pub steps: Vec<GaugeStep>,
}

pub fn gauge(risk_score: f64, threshold: f64) -> Gauge {
    let bar_color = if Decision::from_risk(risk_score, threshold).is_approved() { GREEN } else { RED };
    let cut = threshold * 100.0;

    Gauge {
        value: risk_score * 100.0,
        axis_max: 100.0,
        threshold: cut,
        bar_color,
        steps: vec![
            GaugeStep { from: 0.0, to: cut, color: LIGHT_GREEN },
            GaugeStep { from: cut, to: 100.0, color: LIGHT_CORAL },
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: &'static str,
}

/// Horizontal bars, first bar on top
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub bars: Vec<Bar>,
}

/// SHAP impacts ordered by ascending magnitude
pub fn shap_chart(explanation: &Explanation) -> BarChart {
    let mut bars: Vec<Bar> = explanation
        .top_features
        .iter()
        .map(|f| {
            let direction = match f.direction {
                ImpactDirection::Unknown => ImpactDirection::from_impact(f.impact),
                known => known,
            };
            Bar {
                label: f.feature.clone(),
                value: f.impact,
                color: if direction == ImpactDirection::IncreasesRisk { RED } else { GREEN },
            }
        })
        .collect();

    bars.sort_by(|a, b| a.value.abs().total_cmp(&b.value.abs()));

    BarChart {
        title: format!("Top {} factors behind the decision", bars.len()),
        bars,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub title: String,
    pub bins: Vec<Bin>,
    /// Score of the selected client, if any
    pub marker: Option<f64>,
}

/// Risk score distribution over [0, 1] in `bin_count` equal bins
pub fn risk_histogram(records: &[&ClientRecord], bin_count: usize, marker: Option<f64>) -> Histogram {
    let bin_count = bin_count.max(1);
    let width = 1.0 / bin_count as f64;

    let mut bins: Vec<Bin> = (0..bin_count)
        .map(|i| Bin {
            start: i as f64 * width,
            end: (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for record in records {
        let score = record.risk_score;
        if !(0.0..=1.0).contains(&score) {
            continue;
        }
        // 1.0 lands in the last bin
        let idx = ((score / width) as usize).min(bin_count - 1);
        bins[idx].count += 1;
    }

    Histogram {
        title: "Risk score distribution".to_string(),
        bins,
        marker,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter {
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<Point>,
}

/// Age vs risk, sampled with a fixed stride down to `sample_size` points
pub fn age_risk_scatter(
    dataset: &Dataset,
    records: &[&ClientRecord],
    sample_size: usize,
) -> Result<Scatter, DatasetError> {
    let age_idx = dataset.column(AGE_COLUMN)?;
    let stride = records.len().div_ceil(sample_size.max(1)).max(1);

    let points = records
        .iter()
        .step_by(stride)
        .filter_map(|r| {
            let age = age_years(r.features[age_idx]);
            (!age.is_nan()).then(|| Point {
                id: r.id,
                x: age,
                y: r.risk_score,
                color: if r.decision.is_approved() { GREEN } else { RED },
            })
        })
        .collect();

    Ok(Scatter {
        x_label: "Age (years)".to_string(),
        y_label: "Risk score".to_string(),
        points,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: &'static str,
    pub count: usize,
    pub share: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pie {
    pub title: String,
    pub slices: Vec<Slice>,
}

/// Decision split; empty slices list for an empty subset
pub fn decision_pie(records: &[&ClientRecord]) -> Pie {
    let total = records.len();
    let approved = records.iter().filter(|r| r.decision.is_approved()).count();

    let slices = if total == 0 {
        Vec::new()
    } else {
        let share = |count: usize| count as f64 / total as f64;
        vec![
            Slice { label: Decision::Accord.as_str(), count: approved, share: share(approved), color: GREEN },
            Slice { label: Decision::Refus.as_str(), count: total - approved, share: share(total - approved), color: RED },
        ]
    };

    Pie {
        title: "Decisions".to_string(),
        slices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::FeatureImpact;

    const SAMPLE: &str = "\
SK_ID_CURR,DAYS_BIRTH,RISK_SCORE,DECISION,REAL_TARGET
100001,-9461,0.05,ACCORD,0
100002,-12000,0.95,REFUS,1
100003,-16765,1.0,REFUS,0
100004,,0.25,ACCORD,0
";

    #[test]
    fn test_gauge_green_below_threshold() {
        let g = gauge(0.05, 0.09);
        assert_eq!(g.bar_color, GREEN);
        assert!((g.value - 5.0).abs() < 1e-9);
        assert!((g.threshold - 9.0).abs() < 1e-9);
        assert_eq!(g.steps[0].color, LIGHT_GREEN);
        assert_eq!(g.steps[1].to, 100.0);
    }

    #[test]
    fn test_gauge_red_at_threshold() {
        assert_eq!(gauge(0.09, 0.09).bar_color, RED);
        assert_eq!(gauge(0.6, 0.09).bar_color, RED);
    }

    #[test]
    fn test_shap_chart_order_and_colors() {
        let explanation = Explanation {
            top_features: vec![
                FeatureImpact { feature: "EXT_SOURCE_3".into(), impact: -0.42, direction: ImpactDirection::DecreasesRisk },
                FeatureImpact { feature: "DAYS_BIRTH".into(), impact: 0.13, direction: ImpactDirection::IncreasesRisk },
                FeatureImpact { feature: "AMT_CREDIT".into(), impact: 0.02, direction: ImpactDirection::Unknown },
            ],
            interpretation: String::new(),
        };

        let chart = shap_chart(&explanation);
        let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["AMT_CREDIT", "DAYS_BIRTH", "EXT_SOURCE_3"]);
        assert_eq!(chart.bars[0].color, RED);
        assert_eq!(chart.bars[2].color, GREEN);
    }

    #[test]
    fn test_histogram_bins() {
        let ds = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        let records: Vec<&ClientRecord> = ds.records().iter().collect();

        let hist = risk_histogram(&records, 4, Some(0.05));
        let counts: Vec<usize> = hist.bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 0, 2]);
        assert_eq!(hist.marker, Some(0.05));
    }

    #[test]
    fn test_scatter_skips_missing_age() {
        let ds = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        let records: Vec<&ClientRecord> = ds.records().iter().collect();

        let scatter = age_risk_scatter(&ds, &records, 100).unwrap();
        assert_eq!(scatter.points.len(), 3);
        assert_eq!(scatter.points[0].x, 25.0);
        assert_eq!(scatter.points[0].color, GREEN);
    }

    #[test]
    fn test_scatter_sampling() {
        let ds = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        let records: Vec<&ClientRecord> = ds.records().iter().collect();

        let scatter = age_risk_scatter(&ds, &records, 2).unwrap();
        let ids: Vec<i64> = scatter.points.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![100001, 100003]);
    }

    #[test]
    fn test_decision_pie() {
        let ds = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        let records: Vec<&ClientRecord> = ds.records().iter().collect();

        let pie = decision_pie(&records);
        assert_eq!(pie.slices.len(), 2);
        assert_eq!(pie.slices[0].count, 2);
        assert_eq!(pie.slices[0].share, 0.5);

        assert!(decision_pie(&[]).slices.is_empty());
    }
}
