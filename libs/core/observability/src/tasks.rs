use metrics::{counter, histogram};

/// Counters and histograms for task operations.
pub struct TaskMetrics;

impl TaskMetrics {
    /// `outcome` is `ok` or the lowercase error kind, e.g. `not_found`.
    pub fn record_operation(operation: &'static str, outcome: &'static str) {
        counter!(
            "task_operations_total",
            "operation" => operation,
            "outcome" => outcome
        )
        .increment(1);
    }

    pub fn record_page_size(items: usize) {
        histogram!("task_list_page_size").record(items as f64);
    }
}
