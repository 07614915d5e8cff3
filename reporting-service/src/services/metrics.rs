//! Prometheus metrics for reporting-service.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder};
use std::sync::OnceLock;

/// Recorder behind the `metrics` facade used by the HTTP middleware.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Database query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "reporting_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to register db_query_duration")
});

/// Sub-fetches of the entity aggregate that degraded to an empty value.
pub static SUBFETCH_FAILURES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "reporting_subfetch_failures_total",
        "Entity aggregate sub-fetches that failed and were returned empty",
        &["relation"]
    )
    .expect("Failed to register subfetch_failures_total")
});

/// Report computations by report and outcome.
pub static REPORTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "reporting_reports_total",
        "Total number of reports computed",
        &["report", "outcome"] // success, error
    )
    .expect("Failed to register reports_total")
});

/// Connection attempts per candidate.
pub static CONNECTION_ATTEMPTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "reporting_connection_attempts_total",
        "Database connection attempts by candidate and outcome",
        &["candidate", "outcome"]
    )
    .expect("Failed to register connection_attempts_total")
});

/// Initialize all metrics. Safe to call more than once.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_none() {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                let _ = METRICS_HANDLE.set(handle);
            }
            Err(e) => tracing::warn!(error = %e, "Prometheus recorder not installed"),
        }
    }

    Lazy::force(&DB_QUERY_DURATION);
    Lazy::force(&SUBFETCH_FAILURES_TOTAL);
    Lazy::force(&REPORTS_TOTAL);
    Lazy::force(&CONNECTION_ATTEMPTS_TOTAL);
}

/// Record the outcome of one report computation.
pub fn record_report<T, E>(report: &str, result: &Result<T, E>) {
    let outcome = if result.is_ok() { "success" } else { "error" };
    REPORTS_TOTAL.with_label_values(&[report, outcome]).inc();
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_default();

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    if let Ok(custom) = encoder.encode_to_string(&metric_families) {
        output.push_str(&custom);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_outcomes_show_up_in_output() {
        init_metrics();
        record_report::<(), ()>("sales_statistics", &Ok(()));
        record_report::<(), ()>("sales_statistics", &Err(()));

        let output = get_metrics();
        assert!(output.contains("reporting_reports_total"));
        assert!(output.contains("outcome=\"error\""));
    }
}
