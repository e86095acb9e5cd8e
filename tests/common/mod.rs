// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::Arc;

use emotion_sentiment_analyzer::config::ArtifactsConfig;
use emotion_sentiment_analyzer::feedback::{DynFeedbackSink, MemorySink};
use emotion_sentiment_analyzer::normalize::NormalizerOptions;
use emotion_sentiment_analyzer::{AppState, InferenceContext};

pub const DEMO_ARTIFACTS: &str = "demo/artifacts";

/// Context over the bundled demo artifacts (cargo runs tests from the
/// package root).
pub fn demo_ctx() -> InferenceContext {
    InferenceContext::from_artifacts(
        &ArtifactsConfig::in_dir(DEMO_ARTIFACTS),
        NormalizerOptions::default(),
    )
    .expect("demo artifacts load")
}

pub fn demo_state() -> (AppState, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let dyn_sink: DynFeedbackSink = sink.clone();
    (AppState::new(Arc::new(demo_ctx()), dyn_sink), sink)
}
