//! Comparison filters
//!
//! Narrows the test set to an age/income band and aggregates it so a client
//! can be compared with similar profiles.

use serde::{Deserialize, Serialize};

use crate::dataset::{ClientRecord, Dataset, DatasetError};

/// Birth date as a negative day offset from the application date
pub const AGE_COLUMN: &str = "DAYS_BIRTH";
/// Declared yearly income
pub const INCOME_COLUMN: &str = "AMT_INCOME_TOTAL";

/// Inclusive numeric range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// NaN is never inside a range
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonFilter {
    /// Age in whole years
    pub age: Option<Range>,
    pub income: Option<Range>,
}

/// Aggregates over a filtered subset. `None` when the subset is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub count: usize,
    pub mean_risk: Option<f64>,
    pub approval_rate: Option<f64>,
    pub default_rate: Option<f64>,
}

/// Whole years from a `DAYS_BIRTH` offset
pub fn age_years(days_birth: f64) -> f64 {
    (-days_birth / 365.0).floor()
}

/// Records matching every range in `filter`
pub fn filter<'a>(
    dataset: &'a Dataset,
    filter: &ComparisonFilter,
) -> Result<Vec<&'a ClientRecord>, DatasetError> {
    let age_idx = filter.age.map(|_| dataset.column(AGE_COLUMN)).transpose()?;
    let income_idx = filter.income.map(|_| dataset.column(INCOME_COLUMN)).transpose()?;

    let subset = dataset
        .records()
        .iter()
        .filter(|record| match (filter.age, age_idx) {
            (Some(range), Some(idx)) => range.contains(age_years(record.features[idx])),
            _ => true,
        })
        .filter(|record| match (filter.income, income_idx) {
            (Some(range), Some(idx)) => range.contains(record.features[idx]),
            _ => true,
        })
        .collect();

    Ok(subset)
}

/// Mean risk, approval rate and default rate of `records`
pub fn summarize(records: &[&ClientRecord]) -> ComparisonSummary {
    let count = records.len();

    if count == 0 {
        return ComparisonSummary {
            count,
            mean_risk: None,
            approval_rate: None,
            default_rate: None,
        };
    }

    let n = count as f64;
    let risk_sum: f64 = records.iter().map(|r| r.risk_score).sum();
    let approved = records.iter().filter(|r| r.decision.is_approved()).count();
    let defaults = records.iter().filter(|r| r.is_default()).count();

    ComparisonSummary {
        count,
        mean_risk: Some(risk_sum / n),
        approval_rate: Some(approved as f64 / n),
        default_rate: Some(defaults as f64 / n),
    }
}

/// Filter then summarize
pub fn compare(dataset: &Dataset, comparison: &ComparisonFilter) -> Result<ComparisonSummary, DatasetError> {
    let subset = filter(dataset, comparison)?;
    Ok(summarize(&subset))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
SK_ID_CURR,AMT_INCOME_TOTAL,DAYS_BIRTH,RISK_SCORE,DECISION,REAL_TARGET
1,270000,-16765,0.31,REFUS,0
2,202500,-9461,0.05,ACCORD,0
3,67500,-19046,0.12,REFUS,1
4,135000,-12000,0.02,ACCORD,0
5,,-14000,0.40,REFUS,1
";

    fn dataset() -> Dataset {
        Dataset::from_reader(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_age_years() {
        assert_eq!(age_years(-9461.0), 25.0);
        assert_eq!(age_years(-16765.0), 45.0);
        assert!(age_years(f64::NAN).is_nan());
    }

    #[test]
    fn test_no_filter_keeps_everything() {
        let summary = compare(&dataset(), &ComparisonFilter::default()).unwrap();
        assert_eq!(summary.count, 5);
        assert_eq!(summary.approval_rate, Some(0.4));
        assert_eq!(summary.default_rate, Some(0.4));
    }

    #[test]
    fn test_age_filter() {
        let comparison = ComparisonFilter {
            age: Some(Range::new(20.0, 40.0)),
            income: None,
        };
        let ds = dataset();
        let subset = filter(&ds, &comparison).unwrap();
        let ids: Vec<i64> = subset.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4, 5]);
    }

    #[test]
    fn test_income_filter_skips_missing_values() {
        let comparison = ComparisonFilter {
            age: None,
            income: Some(Range::new(100_000.0, 300_000.0)),
        };
        let ds = dataset();
        let ids: Vec<i64> = filter(&ds, &comparison).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_aggregates_within_unit_interval() {
        let ds = dataset();
        for (lo, hi) in [(18.0, 30.0), (30.0, 60.0), (18.0, 100.0)] {
            let comparison = ComparisonFilter { age: Some(Range::new(lo, hi)), income: None };
            let summary = compare(&ds, &comparison).unwrap();
            assert!(summary.count > 0);
            for value in [summary.mean_risk, summary.approval_rate, summary.default_rate] {
                let v = value.unwrap();
                assert!((0.0..=1.0).contains(&v), "{v} out of range");
            }
        }
    }

    #[test]
    fn test_empty_subset_is_undefined() {
        let comparison = ComparisonFilter {
            age: Some(Range::new(90.0, 100.0)),
            income: None,
        };
        let summary = compare(&dataset(), &comparison).unwrap();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean_risk, None);
        assert_eq!(summary.approval_rate, None);
        assert_eq!(summary.default_rate, None);
    }

    #[test]
    fn test_missing_filter_column() {
        let csv = "SK_ID_CURR,RISK_SCORE,DECISION,REAL_TARGET\n1,0.2,ACCORD,0\n";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        let comparison = ComparisonFilter { age: Some(Range::new(18.0, 60.0)), income: None };
        assert!(matches!(
            compare(&ds, &comparison),
            Err(DatasetError::MissingColumn(ref c)) if c == AGE_COLUMN
        ));
    }
}
