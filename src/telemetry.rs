//! Telemetry metric name constants.
//!
//! Centralised metric names for nerview operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `nerview_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `operation` — API call made ("warm_up" | "predict")
//! - `status` — outcome: "ok" or "error"

/// Total requests sent to the Hub endpoint.
///
/// Labels: `operation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "nerview_requests_total";

/// Request duration in seconds.
///
/// Labels: `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "nerview_request_duration_seconds";

/// Total user-facing alerts raised by failed predictions.
pub const ALERTS_TOTAL: &str = "nerview_alerts_total";
