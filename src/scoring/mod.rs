//! Scoring Module - Remote Credit Scoring API
//!
//! - `client.rs` - HTTP client with per-call timeouts
//! - `types.rs` - request/response shapes and the decision rule

pub mod client;
pub mod types;

pub use client::{Availability, ScoringClient, ScoringConfig, ScoringError};
pub use types::{
    ApiStatus, Decision, Explanation, FeatureImpact, ImpactDirection, ModelInfo,
    PredictionResult, DEFAULT_THRESHOLD,
};
