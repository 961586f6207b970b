//! Metrics collection and Prometheus export.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const COURSES_CREATED: &str = "courses_created_total";
pub const COURSES_UPDATED: &str = "courses_updated_total";
pub const COURSES_DELETED: &str = "courses_deleted_total";
pub const COURSE_CONFLICTS: &str = "course_conflicts_total";

/// Install the Prometheus recorder.
///
/// Call once at startup before any metrics are recorded. A second call is a
/// no-op so test binaries can share one recorder.
pub fn init_metrics() -> Result<(), anyhow::Error> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {}", e))?;

    METRICS_HANDLE
        .set(handle)
        .map_err(|_| anyhow::anyhow!("failed to set metrics handle: already initialized"))
}

/// Current metrics in Prometheus text format, for the /metrics endpoint.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}
