// src/feedback/mod.rs
//! User correction feedback: record shape, sink abstraction and the
//! fire-and-forget submit path. A failing sink never affects a prediction
//! that was already delivered; it only produces a warning.

pub mod file;
pub mod mongo;

use async_trait::async_trait;
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{FeedbackBackend, FeedbackConfig};
use crate::engine::anon_hash;
use crate::error::{AnalyzerError, Result};

pub use file::JsonlFileSink;
pub use mongo::MongoDataApiSink;

/// One stored correction. Field names match the existing collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Predicted")]
    pub predicted: String,
    #[serde(rename = "Actual")]
    pub actual: String,
}

impl FeedbackRecord {
    pub fn new(
        text: impl Into<String>,
        predicted: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            predicted: predicted.into(),
            actual: actual.into(),
        }
    }
}

/// Append-only store. Each `save` adds a new record; no dedup.
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn save(&self, record: &FeedbackRecord) -> anyhow::Result<()>;

    /// Backend name for diagnostics.
    fn name(&self) -> &'static str;
}

pub type DynFeedbackSink = Arc<dyn FeedbackSink>;

/// Drops every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSink;

#[async_trait]
impl FeedbackSink for DisabledSink {
    async fn save(&self, record: &FeedbackRecord) -> anyhow::Result<()> {
        debug!(id = %anon_hash(&record.text), "feedback sink disabled; record dropped");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Keeps records in memory (tests, demos).
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<FeedbackRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<FeedbackRecord> {
        self.records.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl FeedbackSink for MemorySink {
    async fn save(&self, record: &FeedbackRecord) -> anyhow::Result<()> {
        self.records
            .lock()
            .map_err(|_| anyhow::anyhow!("memory sink lock poisoned"))?
            .push(record.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Build the sink selected by config.
pub fn build_sink(cfg: &FeedbackConfig) -> anyhow::Result<DynFeedbackSink> {
    let sink: DynFeedbackSink = match cfg.backend {
        FeedbackBackend::Disabled => Arc::new(DisabledSink),
        FeedbackBackend::File => Arc::new(JsonlFileSink::new(&cfg.path)),
        FeedbackBackend::Mongo => Arc::new(MongoDataApiSink::from_config(cfg)?),
    };
    info!(backend = sink.name(), "feedback sink ready");
    Ok(sink)
}

/// Awaited variant: returns the sink failure to the caller.
pub async fn save_feedback(sink: &dyn FeedbackSink, record: &FeedbackRecord) -> Result<()> {
    match sink.save(record).await {
        Ok(()) => {
            counter!("feedback_submitted_total").increment(1);
            info!(
                backend = sink.name(),
                id = %anon_hash(&record.text),
                predicted = %record.predicted,
                actual = %record.actual,
                "feedback stored"
            );
            Ok(())
        }
        Err(e) => {
            counter!("feedback_failed_total").increment(1);
            Err(AnalyzerError::FeedbackSink(format!("{}: {e:#}", sink.name())))
        }
    }
}

/// Fire-and-forget: spawns the save and logs a warning on failure.
/// Must be called inside a tokio runtime. The handle may be dropped.
pub fn submit_feedback(
    sink: DynFeedbackSink,
    original_text: &str,
    predicted_label: &str,
    actual_label: &str,
) -> JoinHandle<()> {
    let record = FeedbackRecord::new(original_text, predicted_label, actual_label);
    tokio::spawn(async move {
        if let Err(e) = save_feedback(sink.as_ref(), &record).await {
            warn!(error = %e, id = %anon_hash(&record.text), "feedback not saved");
        }
    })
}
