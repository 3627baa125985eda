//! Dashboard page handlers
//!
//! Failures never escape as JSON here: they are rendered inline on the page.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use super::query::{comparison_filter, ComparisonQuery, SelectQuery};
use crate::analysis;
use crate::comparison::ComparisonFilter;
use crate::presentation::html::{self, Sidebar};
use crate::presentation::{AnalysisView, ComparisonView};
use crate::scoring::Availability;
use crate::AppState;

/// Landing page: availability, model banner, selector and comparison charts
pub async fn index(
    State(state): State<AppState>,
    query: Result<Query<ComparisonQuery>, QueryRejection>,
) -> Response {
    let availability = state.scoring.availability().await;
    if !availability.operational {
        return unavailable(&state, &availability);
    }

    let mut body = html::availability_banner(&availability);
    body.push_str("<p>Select a client in the sidebar and press <strong>Analyze</strong>.</p>");

    let (filter, status) = match comparison_filter(query) {
        Ok(filter) => (filter, StatusCode::OK),
        Err(e) => {
            body.push_str(&html::error_block(&e.to_string()));
            (ComparisonFilter::default(), e.status_code())
        }
    };

    let view = match ComparisonView::build(&state.dataset, filter, None, state.config.scatter_sample_size) {
        Ok(view) => view,
        Err(e) => {
            tracing::error!("Comparison failed: {}", e);
            body.push_str(&html::error_block(&e.to_string()));
            return (StatusCode::INTERNAL_SERVER_ERROR, Html(html::layout("Credit Scoring Dashboard", None, &body)))
                .into_response();
        }
    };
    body.push_str(&html::comparison_section(&view));

    let ids = state.dataset.client_ids();
    let sidebar = Sidebar { client_ids: &ids, selected: None, view: &view };

    (status, Html(html::layout("Credit Scoring Dashboard", Some(&sidebar), &body))).into_response()
}

/// Sidebar form target
pub async fn select(Query(query): Query<SelectQuery>) -> Redirect {
    Redirect::to(&format!("/clients/{}", query.id))
}

/// Analysis page for one client
pub async fn client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    query: Result<Query<ComparisonQuery>, QueryRejection>,
) -> Response {
    let availability = state.scoring.availability().await;
    if !availability.operational {
        return unavailable(&state, &availability);
    }

    let mut body = html::availability_banner(&availability);
    let mut status = StatusCode::OK;

    let filter = match comparison_filter(query) {
        Ok(filter) => filter,
        Err(e) => {
            body.push_str(&html::error_block(&e.to_string()));
            status = e.status_code();
            ComparisonFilter::default()
        }
    };

    let expected = state.expected_features_or(availability.model.as_ref());

    let marker = match analysis::analyze(&state.scoring, &state.dataset, id, expected).await {
        Ok(analysis) => {
            body.push_str(&html::analysis_section(&AnalysisView::from_analysis(&analysis)));
            Some(analysis.prediction.risk_score)
        }
        Err(e) => {
            body.push_str(&html::error_block(&e.to_string()));
            status = e.status_code();
            state.dataset.get(id).ok().map(|r| r.risk_score)
        }
    };

    let view = match ComparisonView::build(&state.dataset, filter, marker, state.config.scatter_sample_size) {
        Ok(view) => view,
        Err(e) => {
            tracing::error!("Comparison failed: {}", e);
            body.push_str(&html::error_block(&e.to_string()));
            return (StatusCode::INTERNAL_SERVER_ERROR, Html(html::layout("Client analysis", None, &body)))
                .into_response();
        }
    };
    body.push_str(&html::comparison_section(&view));

    let ids = state.dataset.client_ids();
    let sidebar = Sidebar { client_ids: &ids, selected: Some(id), view: &view };
    let title = format!("Client {id}");

    (status, Html(html::layout(&title, Some(&sidebar), &body))).into_response()
}

fn unavailable(state: &AppState, availability: &Availability) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Html(html::unavailable_page(availability, state.scoring.base_url())),
    )
        .into_response()
}
