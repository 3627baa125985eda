//! Query parameters shared by the dashboard and the JSON API

use axum::extract::{rejection::QueryRejection, Query};
use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::comparison::{ComparisonFilter, Range};
use crate::{AppError, AppResult};

const AGE_FLOOR: f64 = 18.0;
const AGE_CEILING: f64 = 100.0;

/// Comparison bounds. Empty form fields count as absent.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ComparisonQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 18.0, max = 100.0))]
    pub age_min: Option<f64>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 18.0, max = 100.0))]
    pub age_max: Option<f64>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 0.0))]
    pub income_min: Option<f64>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 0.0))]
    pub income_max: Option<f64>,
}

impl ComparisonQuery {
    /// Validate and fill a missing bound with its natural limit
    pub fn into_filter(self) -> AppResult<ComparisonFilter> {
        self.validate()?;

        let age = range(self.age_min, self.age_max, AGE_FLOOR, AGE_CEILING, "age")?;
        let income = range(self.income_min, self.income_max, 0.0, f64::INFINITY, "income")?;

        Ok(ComparisonFilter { age, income })
    }
}

/// Resolve the extracted query, turning a malformed one into a validation error
pub fn comparison_filter(query: Result<Query<ComparisonQuery>, QueryRejection>) -> AppResult<ComparisonFilter> {
    let Query(query) = query?;
    query.into_filter()
}

fn range(min: Option<f64>, max: Option<f64>, floor: f64, ceiling: f64, name: &str) -> AppResult<Option<Range>> {
    if min.is_none() && max.is_none() {
        return Ok(None);
    }
    if min.into_iter().chain(max).any(f64::is_nan) {
        return Err(AppError::Validation(format!("{name} bounds must be numbers")));
    }

    let range = Range::new(min.unwrap_or(floor), max.unwrap_or(ceiling));
    if range.min > range.max {
        return Err(AppError::Validation(format!(
            "{name}_min ({}) is greater than {name}_max ({})",
            range.min, range.max
        )));
    }

    Ok(Some(range))
}

/// Client picked in the sidebar
#[derive(Debug, Deserialize)]
pub struct SelectQuery {
    pub id: i64,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let parsed: f64 = value.parse().map_err(serde::de::Error::custom)?;
            if !parsed.is_finite() {
                return Err(serde::de::Error::custom(format!("expected a finite number, got `{value}`")));
            }
            Ok(Some(parsed))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_has_no_filter() {
        let filter = ComparisonQuery::default().into_filter().unwrap();
        assert_eq!(filter, ComparisonFilter::default());
    }

    #[test]
    fn test_single_bound_is_completed() {
        let query = ComparisonQuery { age_min: Some(30.0), ..Default::default() };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.age, Some(Range::new(30.0, 100.0)));
        assert_eq!(filter.income, None);
    }

    #[test]
    fn test_out_of_range_age_rejected() {
        let query = ComparisonQuery { age_min: Some(12.0), ..Default::default() };
        assert!(matches!(query.into_filter(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let query = ComparisonQuery {
            income_min: Some(200_000.0),
            income_max: Some(100_000.0),
            ..Default::default()
        };
        assert!(matches!(query.into_filter(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_non_finite_bound_does_not_parse() {
        for raw in ["NaN", "inf", "-inf"] {
            let body = format!(r#"{{"age_min": "{raw}", "age_max": "100"}}"#);
            let parsed = serde_json::from_str::<ComparisonQuery>(&body);
            assert!(parsed.is_err(), "{raw} should be rejected");
        }

        let query: ComparisonQuery = serde_json::from_str(r#"{"age_min": " 30 ", "income_max": ""}"#).unwrap();
        assert_eq!(query.age_min, Some(30.0));
        assert_eq!(query.income_max, None);
    }

    #[test]
    fn test_nan_bound_rejected() {
        let query = ComparisonQuery { age_min: Some(f64::NAN), age_max: Some(100.0), ..Default::default() };
        assert!(matches!(query.into_filter(), Err(AppError::Validation(_))));
    }
}
