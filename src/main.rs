//! Credit Scoring Dashboard server
//!
//! Loads the test set, checks the scoring API, then serves the dashboard.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use credit_dashboard::config::Config;
use credit_dashboard::dataset::Dataset;
use credit_dashboard::scoring::{ScoringClient, ScoringConfig};
use credit_dashboard::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "credit_dashboard=debug,tower_http=debug".into());

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Credit Scoring Dashboard starting...");
    tracing::info!("Scoring API: {}", config.api_url);

    // The dataset is required; without it nothing can be rendered
    let dataset = Dataset::load(&config.data_path)
        .with_context(|| format!("Failed to load {}", config.data_path.display()))?;

    let scoring = ScoringClient::new(ScoringConfig::from(&config))
        .context("Failed to create scoring API client")?;

    let availability = scoring.availability().await;
    let expected_features = availability.model.as_ref().and_then(|m| m.num_features);

    if !availability.operational {
        tracing::warn!("Scoring API is not operational yet; pages will report it until it is");
    } else if let Some(model) = &availability.model {
        tracing::info!("{}", model.summary());
    }

    if let Some(expected) = expected_features {
        if expected != dataset.feature_count() {
            tracing::warn!(
                "Model expects {} features but the dataset provides {}",
                expected,
                dataset.feature_count()
            );
        }
    }

    // Build application state
    let state = AppState {
        dataset: Arc::new(dataset),
        scoring,
        config: config.clone(),
        expected_features,
    };

    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Dashboard listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
