//! JSON API handlers

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::Serialize;

use super::query::{comparison_filter, ComparisonQuery};
use crate::analysis::{self, Analysis};
use crate::presentation::{AnalysisView, ComparisonView};
use crate::scoring::Availability;
use crate::{AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct ClientList {
    pub count: usize,
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: Analysis,
    pub view: AnalysisView,
}

/// Remote API availability and model metadata
pub async fn status(State(state): State<AppState>) -> Json<Availability> {
    Json(state.scoring.availability().await)
}

/// Identifiers for the client selector
pub async fn list_clients(State(state): State<AppState>) -> Json<ClientList> {
    let ids = state.dataset.client_ids();
    Json(ClientList { count: ids.len(), ids })
}

/// Score and explain one client
pub async fn analysis(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AnalysisResponse>> {
    let live = match state.expected_features {
        Some(_) => None,
        None => state.scoring.model_info().await.ok(),
    };
    let expected = state.expected_features_or(live.as_ref());

    let analysis = analysis::analyze(&state.scoring, &state.dataset, id, expected).await?;
    let view = AnalysisView::from_analysis(&analysis);

    Ok(Json(AnalysisResponse { analysis, view }))
}

/// Aggregates and charts for an age/income band
pub async fn comparison(
    State(state): State<AppState>,
    query: Result<Query<ComparisonQuery>, QueryRejection>,
) -> AppResult<Json<ComparisonView>> {
    let filter = comparison_filter(query)?;
    let view = ComparisonView::build(&state.dataset, filter, None, state.config.scatter_sample_size)?;

    tracing::debug!(count = view.summary.count, "Comparison computed");

    Ok(Json(view))
}
