//! HTTP handlers

pub mod health;
pub mod api;
pub mod dashboard;
pub mod query;
