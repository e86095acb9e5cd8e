// src/lib.rs
// Public library surface for the service, the CLI and integration tests.

pub mod antonym;
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod lexicon;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod tokenizer;

use std::sync::Arc;

use tracing::info;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::AppConfig;
pub use crate::engine::{Analysis, InferenceContext, Prediction};
pub use crate::error::AnalyzerError;
pub use crate::lexicon::Sentiment;

/// Load config, artifacts and the feedback sink, then build the router.
/// Artifact failures are fatal and returned as errors.
pub fn app() -> anyhow::Result<axum::Router> {
    let cfg = AppConfig::load()?;
    let ctx = Arc::new(InferenceContext::from_config(&cfg)?);
    let sink = feedback::build_sink(&cfg.feedback)?;
    info!(labels = ctx.labels().len(), "analyzer ready");
    Ok(router(AppState::new(ctx, sink)))
}
