//! Presentation Layer
//!
//! - `charts.rs` - gauge, SHAP bars, histogram, scatter, pie
//! - `views.rs` - metrics and banners for the analysis and comparison panels
//! - `html.rs` - page rendering

pub mod charts;
pub mod html;
pub mod views;

pub use views::{AnalysisView, ComparisonView};
