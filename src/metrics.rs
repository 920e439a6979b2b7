use axum::{routing::get, Router};
use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize the Prometheus recorder and describe the triage counters.
    pub fn init() -> Self {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("prometheus: install recorder");

        describe_counter!(
            "triage_analyze_requests_total",
            "POST /api/analyze requests received"
        );
        describe_counter!(
            "triage_rejected_inputs_total",
            "Requests rejected for a missing or too-short description"
        );
        describe_counter!(
            "triage_classifier_fallbacks_total",
            "Classifier calls that degraded to the fallback record"
        );
        describe_counter!(
            "triage_pipeline_failures_total",
            "Pipeline panics answered with the 500 sentinel body"
        );

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
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
