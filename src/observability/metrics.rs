//! Metrics collection.
//!
//! # Metrics
//! - `named_log_handles_created_total` (counter)
//! - `named_log_handles_recreated_total` (counter): by reason
//! - `named_log_config_reloads_total` (counter): by outcome
//! - `named_log_sink_open_failures_total` (counter)
//! - `named_log_lines_written_total` (counter): by sink

use metrics::counter;

pub fn record_handle_created() {
    counter!("named_log_handles_created_total").increment(1);
}

/// `reason` is one of `file_path`, `outputs`.
pub fn record_handle_recreated(reason: &'static str) {
    counter!("named_log_handles_recreated_total", "reason" => reason).increment(1);
}

/// `outcome` is one of `replaced`, `failed`.
pub fn record_config_reload(outcome: &'static str) {
    counter!("named_log_config_reloads_total", "outcome" => outcome).increment(1);
}

pub fn record_sink_open_failure() {
    counter!("named_log_sink_open_failures_total").increment(1);
}

/// `sink` is one of `file`, `console`.
pub fn record_line_written(sink: &'static str) {
    counter!("named_log_lines_written_total", "sink" => sink).increment(1);
}
