//! Credit Scoring Dashboard
//!
//! Web front for a remote credit-scoring API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  CREDIT SCORING DASHBOARD                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌────────────┐  ┌────────────────────────┐ │
//! │  │ Dashboard │  │  JSON API  │  │  Presentation          │ │
//! │  │  (HTML)   │  │  (Axum)    │  │  (gauge, SHAP, charts) │ │
//! │  └─────┬─────┘  └─────┬──────┘  └───────────▲────────────┘ │
//! │        └──────────────┼─────────────────────┘              │
//! │          ┌────────────┴────────────┐                        │
//! │          ▼                         ▼                        │
//! │   ┌─────────────┐          ┌──────────────┐                 │
//! │   │  Dataset    │          │ Scoring API  │ ──▶ /predict    │
//! │   │  (CSV, Arc) │          │   client     │ ──▶ /explain    │
//! │   └─────────────┘          └──────────────┘                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod analysis;
pub mod comparison;
pub mod config;
pub mod dataset;
pub mod error;
pub mod handlers;
pub mod presentation;
pub mod scoring;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::{AppError, AppResult};

use dataset::Dataset;
use scoring::ScoringClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub scoring: ScoringClient,
    pub config: config::Config,
    /// Input width declared by the remote model at startup
    pub expected_features: Option<usize>,
}

impl AppState {
    /// Declared input width, falling back to the live model when startup
    /// could not read it
    pub fn expected_features_or(&self, live: Option<&scoring::ModelInfo>) -> Option<usize> {
        self.expected_features.or_else(|| live.and_then(|m| m.num_features))
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    // Dashboard pages
    let pages = Router::new()
        .route("/", get(handlers::dashboard::index))
        .route("/analyze", get(handlers::dashboard::select))
        .route("/clients/:id", get(handlers::dashboard::client));

    // JSON API
    let api = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/status", get(handlers::api::status))
        .route("/api/v1/clients", get(handlers::api::list_clients))
        .route("/api/v1/clients/:id/analysis", get(handlers::api::analysis))
        .route("/api/v1/comparison", get(handlers::api::comparison));

    Router::new()
        .merge(pages)
        .merge(api)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
