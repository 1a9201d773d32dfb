//! Prometheus metrics for the task and user services.
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, metrics_middleware, TaskMetrics};
//!
//! init_metrics()?;
//! TaskMetrics::record_operation("create", "ok");
//!
//! let app = Router::new()
//!     .route("/metrics", get(metrics_handler))
//!     .layer(axum::middleware::from_fn(metrics_middleware));
//! ```

pub mod middleware;
pub mod tasks;
pub mod users;

pub use middleware::metrics_middleware;
pub use tasks::TaskMetrics;
pub use users::UserMetrics;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the global Prometheus recorder. Later calls return the same handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        register_metric_descriptions();
        info!("Prometheus metrics recorder initialized");
        Ok(handle)
    })
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// `GET /metrics` in the Prometheus text format.
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "HTTP responses with a 4xx or 5xx status"
    );

    describe_counter!(
        "task_operations_total",
        "Task service operations by operation and outcome"
    );
    describe_histogram!("task_list_page_size", "Number of tasks returned per list page");
    describe_counter!("user_registrations_total", "User registrations by outcome");
    describe_counter!("user_logins_total", "Login attempts by outcome");
}
