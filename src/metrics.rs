// src/metrics.rs
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static GLOBAL: OnceCell<Metrics> = OnceCell::new();

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder once per process and return it.
    /// Later calls reuse the same recorder.
    pub fn install() -> anyhow::Result<&'static Metrics> {
        GLOBAL.get_or_try_init(|| {
            // Use default buckets to avoid API differences across crate versions.
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;

            describe_counter!("analyze_requests_total", "Texts analyzed");
            describe_counter!("analyze_rejected_total", "Empty texts rejected before analysis");
            describe_counter!("feedback_submitted_total", "Feedback records stored");
            describe_counter!("feedback_failed_total", "Feedback records the sink failed to store");
            describe_histogram!("analyze_duration_ms", "Preprocess + inference time in ms");

            Ok(Metrics { handle })
        })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router<S: Clone + Send + Sync + 'static>(&self) -> Router<S> {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
