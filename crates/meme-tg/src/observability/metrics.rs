use super::GLOBAL_LABELS;
use serde::Deserialize;
use std::net::SocketAddr;

/// Histogram buckets to measure the distribution of request durations in seconds
pub(crate) const DEFAULT_DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Deserialize, Clone, Default)]
pub struct MetricsConfig {
    /// Prometheus metrics are exposed on this address only if it's set
    #[serde(default)]
    metrics_listen_addr: Option<SocketAddr>,
}

pub fn init_metrics(config: &MetricsConfig) -> Result<(), metrics_exporter_prometheus::BuildError> {
    let Some(listen_addr) = config.metrics_listen_addr else {
        return Ok(());
    };

    let mut builder = metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(listen_addr)
        .set_buckets(DEFAULT_DURATION_BUCKETS)?;

    for (key, value) in GLOBAL_LABELS {
        builder = builder.add_global_label(*key, *value);
    }

    builder.install()
}
